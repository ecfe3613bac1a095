/// Opaque session tokens
///
/// Clients hold the hex token; the database only ever sees its SHA-256.
use actix_web::http::header::AUTHORIZATION;
use actix_web::HttpRequest;
use crypto_core::generate_token;

/// A freshly minted token and the hash to persist for it.
#[derive(Debug, Clone)]
pub struct NewSessionToken {
    pub token: String,
    pub token_hash: String,
}

impl NewSessionToken {
    pub fn generate() -> Self {
        let (token, token_hash) = generate_token();
        Self { token, token_hash }
    }
}

/// Read the raw token from `Authorization: Bearer <t>`, falling back to the
/// session cookie. The header wins when both are present.
pub fn extract_token(req: &HttpRequest, cookie_name: &str) -> Option<String> {
    let bearer = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    bearer.or_else(|| {
        req.cookie(cookie_name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

    #[test]
    fn bearer_header_is_read() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer abc123"))
            .to_http_request();
        assert_eq!(extract_token(&req, "sessionid").as_deref(), Some("abc123"));
    }

    #[test]
    fn cookie_is_fallback() {
        let req = TestRequest::default()
            .cookie(Cookie::new("sessionid", "from-cookie"))
            .to_http_request();
        assert_eq!(extract_token(&req, "sessionid").as_deref(), Some("from-cookie"));
    }

    #[test]
    fn header_wins_over_cookie() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer from-header"))
            .cookie(Cookie::new("sessionid", "from-cookie"))
            .to_http_request();
        assert_eq!(extract_token(&req, "sessionid").as_deref(), Some("from-header"));
    }

    #[test]
    fn other_schemes_are_ignored() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert_eq!(extract_token(&req, "sessionid"), None);
    }

    #[test]
    fn generated_tokens_hash_consistently() {
        let minted = NewSessionToken::generate();
        assert_eq!(minted.token.len(), 64);
        assert_eq!(
            crypto_core::parse_token(&minted.token).unwrap(),
            minted.token_hash
        );
    }
}

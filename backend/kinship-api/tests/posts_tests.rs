//! Feed visibility, post CRUD, likes and comments over HTTP
mod common;

use actix_web::test;
use common::{authed, befriend, build_state, create_post, send, setup_app, signup, start_postgres};
use serde_json::json;

#[actix_web::test]
#[ignore = "Requires Docker (testcontainers)"]
async fn feed_shows_own_and_friends_posts_newest_first() {
    let (_pg, url) = start_postgres().await;
    let app = setup_app(build_state(&url).await).await;
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;
    let carol = signup(&app, "carol").await;

    // alice -> bob accepted; carol is a stranger to alice
    befriend(&app, ("alice", &alice), ("bob", &bob)).await;

    let first = create_post(&app, &alice, "alice first").await;
    let bobs = create_post(&app, &bob, "bob post").await;
    let _carols = create_post(&app, &carol, "carol post").await;
    let last = create_post(&app, &alice, "alice second").await;

    let (status, feed) = send(&app, authed(test::TestRequest::get().uri("/api/posts/"), &alice)).await;
    assert_eq!(status, 200);
    assert_eq!(feed["count"], 3);
    let ids: Vec<i64> = feed["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![last, bobs, first]);
    assert_eq!(feed["results"][1]["author"]["username"], "bob");

    // friendship is symmetric: bob sees alice's posts too
    let (_, feed) = send(&app, authed(test::TestRequest::get().uri("/api/posts/"), &bob)).await;
    assert_eq!(feed["count"], 3);

    let (_, feed) = send(&app, authed(test::TestRequest::get().uri("/api/posts/"), &carol)).await;
    assert_eq!(feed["count"], 1);
}

#[actix_web::test]
#[ignore = "Requires Docker (testcontainers)"]
async fn feed_pagination_envelope() {
    let (_pg, url) = start_postgres().await;
    let app = setup_app(build_state(&url).await).await;
    let alice = signup(&app, "alice").await;
    for i in 0..5 {
        create_post(&app, &alice, &format!("post {}", i)).await;
    }

    let (status, page) = send(
        &app,
        authed(test::TestRequest::get().uri("/api/posts/?page=2&limit=2"), &alice),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(page["count"], 5);
    assert_eq!(page["page"], 2);
    assert_eq!(page["limit"], 2);
    assert_eq!(page["next"], 3);
    assert_eq!(page["previous"], 1);
    assert_eq!(page["results"].as_array().unwrap().len(), 2);

    let (status, page) = send(
        &app,
        authed(test::TestRequest::get().uri("/api/posts/?page=9&limit=2"), &alice),
    )
    .await;
    assert_eq!(status, 200);
    assert!(page["results"].as_array().unwrap().is_empty());
    assert!(page["next"].is_null());

    let (status, _) = send(
        &app,
        authed(test::TestRequest::get().uri("/api/posts/?page=0"), &alice),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = send(
        &app,
        authed(test::TestRequest::get().uri("/api/posts/?page=abc"), &alice),
    )
    .await;
    assert_eq!(status, 400);
}

#[actix_web::test]
#[ignore = "Requires Docker (testcontainers)"]
async fn strangers_cannot_see_posts() {
    let (_pg, url) = start_postgres().await;
    let app = setup_app(build_state(&url).await).await;
    let alice = signup(&app, "alice").await;
    let mallory = signup(&app, "mallory").await;
    let post = create_post(&app, &alice, "friends only").await;

    let (status, _) = send(
        &app,
        authed(test::TestRequest::get().uri(&format!("/api/posts/{}/", post)), &mallory),
    )
    .await;
    assert_eq!(status, 404);

    let (status, _) = send(
        &app,
        authed(test::TestRequest::get().uri("/api/members/alice/posts/"), &mallory),
    )
    .await;
    assert_eq!(status, 403);

    let (status, _) = send(
        &app,
        authed(test::TestRequest::post().uri(&format!("/api/posts/{}/like/", post)), &mallory),
    )
    .await;
    assert_eq!(status, 404);

    let (status, page) = send(
        &app,
        authed(test::TestRequest::get().uri("/api/members/alice/posts/"), &alice),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(page["count"], 1);
}

#[actix_web::test]
#[ignore = "Requires Docker (testcontainers)"]
async fn create_post_validation() {
    let (_pg, url) = start_postgres().await;
    let app = setup_app(build_state(&url).await).await;
    let alice = signup(&app, "alice").await;

    let (status, _) = send(
        &app,
        authed(
            test::TestRequest::post()
                .uri("/api/posts/")
                .set_json(json!({ "content": "   " })),
            &alice,
        ),
    )
    .await;
    assert_eq!(status, 400);

    let (status, post) = send(
        &app,
        authed(
            test::TestRequest::post().uri("/api/posts/").set_json(json!({
                "content": "with media",
                "media_urls": ["https://cdn.example.com/1.jpg"],
            })),
            &alice,
        ),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(post["media_urls"][0], "https://cdn.example.com/1.jpg");
    assert_eq!(post["likes_count"], 0);
    assert_eq!(post["is_liked"], false);
}

#[actix_web::test]
#[ignore = "Requires Docker (testcontainers)"]
async fn only_author_deletes() {
    let (_pg, url) = start_postgres().await;
    let app = setup_app(build_state(&url).await).await;
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;
    befriend(&app, ("alice", &alice), ("bob", &bob)).await;
    let post = create_post(&app, &alice, "mine").await;

    let (status, _) = send(
        &app,
        authed(test::TestRequest::delete().uri(&format!("/api/posts/{}/", post)), &bob),
    )
    .await;
    assert_eq!(status, 403);

    let (status, _) = send(
        &app,
        authed(test::TestRequest::delete().uri(&format!("/api/posts/{}/", post)), &alice),
    )
    .await;
    assert_eq!(status, 204);

    let (status, _) = send(
        &app,
        authed(test::TestRequest::get().uri(&format!("/api/posts/{}/", post)), &alice),
    )
    .await;
    assert_eq!(status, 404);
}

#[actix_web::test]
#[ignore = "Requires Docker (testcontainers)"]
async fn like_toggles_and_counts() {
    let (_pg, url) = start_postgres().await;
    let app = setup_app(build_state(&url).await).await;
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;
    befriend(&app, ("alice", &alice), ("bob", &bob)).await;
    let post = create_post(&app, &alice, "like me").await;
    let like_uri = format!("/api/posts/{}/like/", post);

    let (status, body) = send(&app, authed(test::TestRequest::post().uri(&like_uri), &bob)).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "liked": true, "likes_count": 1 }));

    let (_, body) = send(&app, authed(test::TestRequest::post().uri(&like_uri), &alice)).await;
    assert_eq!(body, json!({ "liked": true, "likes_count": 2 }));

    let (_, body) = send(&app, authed(test::TestRequest::post().uri(&like_uri), &bob)).await;
    assert_eq!(body, json!({ "liked": false, "likes_count": 1 }));

    let (_, post_body) = send(
        &app,
        authed(test::TestRequest::get().uri(&format!("/api/posts/{}/", post)), &alice),
    )
    .await;
    assert_eq!(post_body["likes_count"], 1);
    assert_eq!(post_body["is_liked"], true);
}

#[actix_web::test]
#[ignore = "Requires Docker (testcontainers)"]
async fn comments_and_replies() {
    let (_pg, url) = start_postgres().await;
    let app = setup_app(build_state(&url).await).await;
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;
    befriend(&app, ("alice", &alice), ("bob", &bob)).await;
    let post = create_post(&app, &alice, "discuss").await;
    let other_post = create_post(&app, &alice, "elsewhere").await;

    let (status, top) = send(
        &app,
        authed(
            test::TestRequest::post()
                .uri(&format!("/api/posts/{}/comment/", post))
                .set_json(json!({ "text": "first!" })),
            &bob,
        ),
    )
    .await;
    assert_eq!(status, 201);
    assert!(top["parent_id"].is_null());
    let top_id = top["id"].as_i64().unwrap();

    let (status, reply) = send(
        &app,
        authed(
            test::TestRequest::post()
                .uri(&format!("/api/posts/{}/comment/", post))
                .set_json(json!({ "text": "thanks", "parent": top_id })),
            &alice,
        ),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(reply["parent_id"], top_id);

    // parent must belong to the same post
    let (status, _) = send(
        &app,
        authed(
            test::TestRequest::post()
                .uri(&format!("/api/posts/{}/comment/", other_post))
                .set_json(json!({ "text": "wrong thread", "parent": top_id })),
            &alice,
        ),
    )
    .await;
    assert_eq!(status, 400);

    let (status, page) = send(
        &app,
        authed(
            test::TestRequest::get().uri(&format!("/api/posts/{}/comments/", post)),
            &alice,
        ),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(page["count"], 2);
    assert_eq!(page["results"][0]["id"], top_id);
    assert_eq!(page["results"][0]["replies_count"], 1);
    assert_eq!(page["results"][1]["author"]["username"], "alice");

    let (_, post_body) = send(
        &app,
        authed(test::TestRequest::get().uri(&format!("/api/posts/{}/", post)), &alice),
    )
    .await;
    assert_eq!(post_body["comments_count"], 2);
}

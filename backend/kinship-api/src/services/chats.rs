/// Chat service - direct chats and their messages
use crate::db::{chat_repo, member_repo, message_repo};
use crate::error::{AppError, Result};
use crate::models::{
    ChatListRow, ChatResponse, MemberSummary, MessageResponse, OpenChatRequest, SendMessageRequest,
};
use crate::pagination::{Page, PageRequest};
use sqlx::PgPool;
use std::collections::HashMap;
use validator::Validate;

pub struct ChatService {
    pool: PgPool,
}

impl ChatService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Chats the viewer belongs to, most recently active first
    pub async fn list_chats(&self, viewer_id: i64, page: PageRequest) -> Result<Page<ChatResponse>> {
        let rows = chat_repo::list_for_member(&self.pool, viewer_id, page.limit, page.offset()).await?;
        let count = chat_repo::count_for_member(&self.pool, viewer_id).await?;

        let chat_ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut members: HashMap<i64, Vec<MemberSummary>> = HashMap::new();
        for row in chat_repo::members_of(&self.pool, &chat_ids).await? {
            members.entry(row.chat_id).or_default().push(row.into());
        }

        Ok(Page::new(rows, count, page).map(|row: ChatListRow| {
            let chat_members = members.remove(&row.id).unwrap_or_default();
            ChatResponse::assemble(viewer_id, row, chat_members)
        }))
    }

    /// Return the direct chat with `username`, creating it when missing.
    /// The boolean is true when a new chat was created.
    pub async fn open_chat(
        &self,
        viewer_id: i64,
        req: OpenChatRequest,
    ) -> Result<(ChatResponse, bool)> {
        req.validate()?;

        let other = member_repo::find_by_username(&self.pool, req.username.trim())
            .await?
            .filter(|m| m.is_active)
            .ok_or_else(|| AppError::not_found("Member"))?;
        if other.id == viewer_id {
            return Err(AppError::BadRequest(
                "You cannot open a chat with yourself".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        member_repo::lock_pair(&mut *tx, viewer_id, other.id).await?;

        let (chat, created) = match chat_repo::find_direct(&mut *tx, viewer_id, other.id).await? {
            Some(chat) => (chat, false),
            None => {
                let chat = chat_repo::create_chat(&mut *tx).await?;
                chat_repo::add_members(&mut *tx, chat.id, &[viewer_id, other.id]).await?;
                (chat, true)
            }
        };
        tx.commit().await?;

        if created {
            tracing::info!(chat_id = chat.id, member_id = viewer_id, other_id = other.id, "chat created");
        }

        let response = self.chat_summary(viewer_id, chat.id).await?;
        Ok((response, created))
    }

    async fn chat_summary(&self, viewer_id: i64, chat_id: i64) -> Result<ChatResponse> {
        let row = chat_repo::find_for_member(&self.pool, viewer_id, chat_id)
            .await?
            .ok_or_else(|| AppError::not_found("Chat"))?;

        let members = chat_repo::members_of(&self.pool, &[chat_id])
            .await?
            .into_iter()
            .map(MemberSummary::from)
            .collect();
        Ok(ChatResponse::assemble(viewer_id, row, members))
    }

    async fn ensure_member(&self, viewer_id: i64, chat_id: i64) -> Result<()> {
        if chat_repo::is_member(&self.pool, chat_id, viewer_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Chat"))
        }
    }

    /// Messages oldest first; reading marks the other members' messages read
    pub async fn list_messages(
        &self,
        viewer_id: i64,
        chat_id: i64,
        page: PageRequest,
    ) -> Result<Page<MessageResponse>> {
        self.ensure_member(viewer_id, chat_id).await?;

        let marked = message_repo::mark_read(&self.pool, chat_id, viewer_id).await?;
        if marked > 0 {
            tracing::debug!(chat_id, member_id = viewer_id, marked, "messages marked read");
        }

        let rows = message_repo::list_for_chat(&self.pool, chat_id, page.limit, page.offset()).await?;
        let count = message_repo::count_for_chat(&self.pool, chat_id).await?;
        Ok(Page::new(rows, count, page).map(MessageResponse::from))
    }

    pub async fn send_message(
        &self,
        viewer_id: i64,
        chat_id: i64,
        req: SendMessageRequest,
    ) -> Result<MessageResponse> {
        req.validate()?;
        self.ensure_member(viewer_id, chat_id).await?;

        let message = message_repo::create_message(&self.pool, chat_id, viewer_id, &req.text).await?;
        tracing::info!(message_id = message.id, chat_id, author_id = viewer_id, "message sent");

        message_repo::find_row(&self.pool, message.id)
            .await?
            .map(MessageResponse::from)
            .ok_or_else(|| AppError::not_found("Message"))
    }
}

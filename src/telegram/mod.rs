//! # Telegram Bot API Module
//!
//! Minimal Bot API client used as the chat platform: long polling for new
//! messages, replies and reactions. Only the calls the bot needs are covered.
//!
//! ## API Coverage
//!
//! - `getUpdates` - Long polling for incoming messages
//! - `sendMessage` - MarkdownV2 reply to the message that carried the link
//! - `setMessageReaction` - Emoji reaction on that message

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tokio::time::sleep;

use crate::{
    Res, debug,
    dispatch::{MessageRef, Reply, ReplySink},
    spotify::MAX_ATTEMPTS,
    types::{
        LinkPreviewOptions, ReactionType, ReplyParameters, SendMessageRequest, SetReactionRequest,
        TelegramResponse, Update,
    },
};

/// Seconds a `getUpdates` call may be held open by the server.
pub const LONG_POLL_SECS: u64 = 30;

/// Offset to request next so every update in `updates` is acknowledged,
/// including the ones the bot ignores.
pub fn next_offset(current: Option<i64>, updates: &[Update]) -> Option<i64> {
    updates
        .iter()
        .map(|u| u.update_id + 1)
        .max()
        .map_or(current, |next| Some(current.map_or(next, |c| c.max(next))))
}

pub struct TelegramClient {
    http: Client,
    base_url: String,
}

impl TelegramClient {
    /// Creates a client; `timeout` bounds every call beyond the long poll window.
    pub fn new(api_url: &str, token: &str, timeout: Duration) -> Res<Self> {
        let http = Client::builder()
            .timeout(timeout + Duration::from_secs(LONG_POLL_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        })
    }

    /// Fetches updates after `offset`, waiting up to [`LONG_POLL_SECS`].
    pub async fn get_updates(&self, offset: Option<i64>) -> Res<Vec<Update>> {
        #[derive(Serialize)]
        struct GetUpdates {
            #[serde(skip_serializing_if = "Option::is_none")]
            offset: Option<i64>,
            timeout: u64,
            allowed_updates: [&'static str; 1],
        }

        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout: LONG_POLL_SECS,
                allowed_updates: ["message"],
            },
        )
        .await
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Res<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let mut attempt = 1;
        loop {
            let url = format!("{}/{}", self.base_url, method);
            let response = self.http.post(&url).json(body).send().await?;
            let status = response.status();
            let json = response.json::<TelegramResponse<T>>().await?;

            if status == StatusCode::TOO_MANY_REQUESTS && attempt < MAX_ATTEMPTS {
                let retry_after = json
                    .parameters
                    .as_ref()
                    .and_then(|p| p.retry_after)
                    .unwrap_or(1);
                debug!("telegram rate limit, retrying in {} seconds", retry_after);
                sleep(Duration::from_secs(retry_after)).await;
                attempt += 1;
                continue;
            }

            return match (json.ok, json.result) {
                (true, Some(result)) => Ok(result),
                _ => Err(format!(
                    "telegram {} failed ({}): {}",
                    method,
                    status,
                    json.description.unwrap_or_default()
                )
                .into()),
            };
        }
    }
}

#[async_trait]
impl ReplySink for TelegramClient {
    async fn reply(&self, to: MessageRef, reply: &Reply) -> Res<()> {
        let request = SendMessageRequest {
            chat_id: to.chat_id,
            text: reply.text.clone(),
            parse_mode: "MarkdownV2".to_string(),
            disable_notification: true,
            reply_parameters: ReplyParameters {
                message_id: to.message_id,
            },
            link_preview_options: reply
                .preview_url
                .as_ref()
                .map(|url| LinkPreviewOptions { url: url.clone() }),
        };

        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }

    async fn react(&self, to: MessageRef, reaction: &str) -> Res<()> {
        let request = SetReactionRequest {
            chat_id: to.chat_id,
            message_id: to.message_id,
            reaction: vec![ReactionType {
                kind: "emoji".to_string(),
                emoji: reaction.to_string(),
            }],
        };

        let _: bool = self.call("setMessageReaction", &request).await?;
        Ok(())
    }
}

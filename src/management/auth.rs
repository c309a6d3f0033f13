use std::path::PathBuf;

use chrono::Utc;
use reqwest::Client;

use crate::{
    config, debug,
    error::{Result, SyncError},
    types::Token,
};

// refresh this many seconds before the token actually expires
const EXPIRY_MARGIN_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    /// Loads the cached token, or seeds one from `SPOTIFY_REFRESH_TOKEN`.
    ///
    /// A seeded token carries no access token and counts as expired, so the
    /// first call to [`TokenManager::get_valid_token`] refreshes it.
    pub async fn load() -> Result<Self> {
        let path = Self::token_path();
        if let Ok(content) = async_fs::read_to_string(&path).await {
            let token: Token = serde_json::from_str(&content)
                .map_err(|e| SyncError::Auth(format!("corrupt token cache: {}", e)))?;
            return Ok(Self { token });
        }

        match config::spotify_refresh_token() {
            Some(refresh_token) => Ok(Self::new(Token {
                access_token: String::new(),
                refresh_token,
                scope: String::new(),
                expires_in: 0,
                obtained_at: 0,
            })),
            None => Err(SyncError::Auth(format!(
                "no cached token at {} and SPOTIFY_REFRESH_TOKEN is not set",
                path.display()
            ))),
        }
    }

    pub async fn persist(&self) -> Result<()> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| SyncError::Auth(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(&self.token)
            .map_err(|e| SyncError::Auth(e.to_string()))?;
        async_fs::write(path, json)
            .await
            .map_err(|e| SyncError::Auth(e.to_string()))
    }

    pub async fn get_valid_token(&mut self, client: &Client) -> Result<String> {
        if self.is_expired() {
            debug!("refreshing spotify access token");
            self.token = self.refresh_token(client).await?;
            if let Err(e) = self.persist().await {
                debug!("cannot persist refreshed token: {}", e);
            }
        }

        Ok(self.token.access_token.clone())
    }

    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        self.token.access_token.is_empty()
            || now + EXPIRY_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    async fn refresh_token(&self, client: &Client) -> Result<Token> {
        let client_id = config::spotify_client_id().map_err(|e| SyncError::Auth(e.to_string()))?;
        let client_secret =
            config::spotify_client_secret().map_err(|e| SyncError::Auth(e.to_string()))?;

        let res = client
            .post(config::spotify_apitoken_url())
            .basic_auth(client_id, Some(client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.token.refresh_token.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let json: serde_json::Value = res.json().await?;
        let access_token = json["access_token"]
            .as_str()
            .ok_or_else(|| SyncError::Auth("token response without access_token".to_string()))?;

        Ok(Token {
            access_token: access_token.to_string(),
            // spotify only sometimes rotates the refresh token
            refresh_token: json["refresh_token"]
                .as_str()
                .unwrap_or(self.token.refresh_token.as_str())
                .to_string(),
            scope: json["scope"].as_str().unwrap_or_default().to_string(),
            expires_in: json["expires_in"].as_i64().unwrap_or(3600) as u64,
            obtained_at: Utc::now().timestamp() as u64,
        })
    }

    fn token_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/token.json");
        path
    }
}

pub mod sender;

use crate::model::NotifyError;
use reqwest::Client;
use std::time::Duration;

pub const API_BASE: &str = "https://api.telegram.org";

pub struct TelegramNotifier {
    pub api_base: String,
    pub bot_token: String,
    pub chat_id: i64,
    pub client: Client,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: i64) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotifyError::ApiError(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            api_base: API_BASE.to_string(),
            bot_token,
            chat_id,
            client,
        })
    }

    pub(crate) fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }

    pub async fn notify_text(&self, text: &str) -> Result<(), NotifyError> {
        sender::send_text(self, text).await
    }

    pub async fn send_report(&self, summary: &str, html: String) -> Result<(), NotifyError> {
        sender::send_report(self, summary, html).await
    }
}

use anyhow::Context;
use async_trait::async_trait;

use super::LeadSink;

pub struct TelegramSink {
    bot_token: String,
    chat_id: String,
    client: reqwest::Client,
}

impl TelegramSink {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            bot_token,
            chat_id,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LeadSink for TelegramSink {
    async fn send_lead(&self, text: &str) -> anyhow::Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);

        self.client
            .post(&url)
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": text,
            }))
            .send()
            .await
            .context("failed to send Telegram message")?
            .error_for_status()
            .context("Telegram API returned error")?;

        Ok(())
    }
}

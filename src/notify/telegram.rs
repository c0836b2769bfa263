use anyhow::Result;
use reqwest::Client;
use tracing::warn;

use crate::models::TipRecord;

/// Sends tip messages to a Telegram chat via the Bot API.
///
/// Token and chat id are injected through configuration; nothing here is
/// hardcoded. Delivery failures are reported to the caller, which logs and
/// carries on; a dropped message never stops the pipeline.
pub struct TelegramNotifier {
    client: Client,
    token: String,
    chat_id: i64,
}

impl TelegramNotifier {
    /// Create a new notifier
    pub fn new(token: &str, chat_id: i64) -> Self {
        Self {
            client: Client::new(),
            token: token.to_string(),
            chat_id,
        }
    }

    /// Send one tip to the configured chat
    pub async fn send_tip(&self, tip: &TipRecord) -> Result<()> {
        let text = format_tip(tip);
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);

        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        });

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Telegram sendMessage failed: {} - {}", status, body);
            anyhow::bail!("Telegram sendMessage failed: {} - {}", status, body);
        }

        Ok(())
    }
}

/// Render a tip as a Telegram HTML message
fn format_tip(tip: &TipRecord) -> String {
    let decider = if tip.is_decider { " (decider)" } else { "" };

    format!(
        "\u{1F3AF} <b>Value tip</b> | {}\n\
         {} vs {}, game {}{}\n\
         Back <b>{}</b>\n\
         EV: {:+.1}% | Confidence: {:.0}%",
        escape_html(&tip.league_name),
        escape_html(&tip.team1_name),
        escape_html(&tip.team2_name),
        tip.game_number,
        decider,
        escape_html(tip.recommended_team()),
        tip.expected_value_percent,
        tip.confidence_percent,
    )
}

/// Escape the characters Telegram's HTML parse mode reserves
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

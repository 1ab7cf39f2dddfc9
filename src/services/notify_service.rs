//! Outbound notifications through the Telegram Bot API.
//!
//! Lead requests await delivery and report relay errors to the client.
//! Review and login notifications are fire-and-forget: failures are logged
//! and never affect the request that triggered them.

use serde_json::json;
use std::time::Duration;

use crate::config::Config;
use crate::error::AppError;
use crate::models::lead::LeadRequest;
use crate::models::review::Review;

/// Relay client. Cheap to clone; the HTTP client is shared.
#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
    api_base: String,
    bot_token: Option<String>,
    chat_id: Option<String>,
}

impl Notifier {
    /// Build the relay client.
    ///
    /// # Timeout
    ///
    /// 5 seconds per request, so a slow relay cannot hold a lead request open.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;

        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Ok(Self {
            client,
            api_base: config.tg_api_base.trim_end_matches('/').to_string(),
            bot_token: non_empty(&config.tg_bot_token),
            chat_id: non_empty(&config.tg_chat_id),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }

    /// Send one message and wait for the relay's answer.
    ///
    /// # Errors
    ///
    /// - `TelegramNotConfigured`: token or chat id missing
    /// - `TelegramError`: non-2xx answer (body passed through) or transport failure
    pub async fn send(&self, text: &str, html: bool) -> Result<(), AppError> {
        let (Some(token), Some(chat_id)) = (&self.bot_token, &self.chat_id) else {
            return Err(AppError::TelegramNotConfigured);
        };

        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
            "disable_web_page_preview": true,
        });
        if html {
            body["parse_mode"] = json!("HTML");
        }

        let response = self
            .client
            .post(format!("{}/bot{token}/sendMessage", self.api_base))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Notification relay request failed: {}", e);
                AppError::TelegramError(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let details = response.text().await.unwrap_or_default();
            tracing::error!(%status, "Notification relay rejected message");
            return Err(AppError::TelegramError(details));
        }

        Ok(())
    }

    /// Send in the background. Does nothing when the relay is not configured.
    pub fn notify(&self, text: String, html: bool) {
        if !self.is_configured() {
            return;
        }
        let notifier = self.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.send(&text, html).await {
                tracing::warn!(error = %e, "background notification dropped");
            }
        });
    }
}

/// Plain-text message for a lead request. Empty fields show as a dash.
pub fn lead_message(lead: &LeadRequest, now: chrono::DateTime<chrono::Utc>) -> String {
    let or_dash = |s: &str| if s.is_empty() { "—".to_string() } else { s.to_string() };
    format!(
        "🧊 New repair request\nName: {}\nPhone: {}\nModel: {}\nProblem: {}\nTime: {}",
        or_dash(&lead.name),
        lead.phone,
        or_dash(&lead.model),
        or_dash(&lead.problem),
        now.format("%Y-%m-%d %H:%M UTC"),
    )
}

/// HTML message announcing a review awaiting moderation.
pub fn review_message(review: &Review) -> String {
    format!(
        "📝 <b>New review (awaiting approval)</b>\n👤 <b>{}</b>\n💬 {}\n🆔 <code>{}</code>",
        escape_html(&review.name),
        escape_html(&review.text),
        escape_html(&review.id),
    )
}

pub fn login_message(ip: &str, user_agent: &str) -> String {
    format!("🔐 Admin login\nIP: {ip}\nUA: {user_agent}")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

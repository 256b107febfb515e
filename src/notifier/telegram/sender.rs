// notifier/telegram/sender.rs

use crate::model::NotifyError;
use crate::notifier::telegram::TelegramNotifier;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use tracing::{info, warn};

/// Telegram rejects longer document captions.
const MAX_CAPTION: usize = 1024;

async fn check_response(result: Result<Response, reqwest::Error>, what: &str) -> Result<(), NotifyError> {
    let response = match result {
        Ok(resp) => resp,
        Err(e) if e.is_timeout() => {
            warn!("⏳ Telegram {} timed out", what);
            return Err(NotifyError::Unreachable);
        }
        Err(e) => {
            warn!("❌ Telegram {} failed: {:?}", what, e);
            return Err(NotifyError::ApiError(format!("Send failed: {}", e)));
        }
    };
    let status = response.status();
    let body = response.text().await.unwrap_or_else(|_| "unknown".into());
    if !status.is_success() {
        warn!("❌ Telegram API responded [{}]: {}", status, body);
        return Err(NotifyError::Unreachable);
    }
    info!("✅ Telegram {} sent [{}]", what, status);
    Ok(())
}

/// Sends a simple text message via Telegram.
pub async fn send_text(notifier: &TelegramNotifier, text: &str) -> Result<(), NotifyError> {
    let params = [
        ("chat_id", notifier.chat_id.to_string()),
        ("text", text.to_string()),
    ];
    let result = notifier
        .client
        .post(notifier.method_url("sendMessage"))
        .form(&params)
        .send()
        .await;
    check_response(result, "text").await
}

/// Uploads the HTML report as `report.html` with `summary` as caption.
pub async fn send_report(notifier: &TelegramNotifier, summary: &str, html: String) -> Result<(), NotifyError> {
    let caption: String = summary.chars().take(MAX_CAPTION).collect();
    let document = Part::bytes(html.into_bytes())
        .file_name("report.html")
        .mime_str("text/html")
        .map_err(|e| NotifyError::ApiError(e.to_string()))?;
    let form = Form::new()
        .text("chat_id", notifier.chat_id.to_string())
        .text("caption", caption)
        .part("document", document);

    info!("📤 Sending report to Telegram chat {}", notifier.chat_id);
    let result = notifier
        .client
        .post(notifier.method_url("sendDocument"))
        .multipart(form)
        .send()
        .await;
    check_response(result, "report").await
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn closed_port_notifier() -> TelegramNotifier {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut notifier = TelegramNotifier::new("token".to_string(), 1).unwrap();
        notifier.api_base = format!("http://{}", addr);
        notifier.client = reqwest::Client::builder().no_proxy().build().unwrap();
        notifier
    }

    #[tokio::test]
    async fn test_send_text_connection_refused() {
        let notifier = closed_port_notifier().await;
        let err = send_text(&notifier, "hello").await.unwrap_err();
        assert!(matches!(err, NotifyError::ApiError(_)));
    }

    #[tokio::test]
    async fn test_send_report_connection_refused() {
        let notifier = closed_port_notifier().await;
        let err = send_report(&notifier, "0 listings", "<html></html>".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::ApiError(_)));
    }
}

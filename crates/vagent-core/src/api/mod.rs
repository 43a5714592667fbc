pub mod assistants;
pub mod chat;

pub use assistants::AssistantClient;
pub use chat::ChatClient;

use reqwest::StatusCode;
use serde::Deserialize;

/// Turn a non-2xx response into a user-facing error, preferring the JSON
/// `detail` field the backend puts in its failure bodies.
pub(crate) async fn error_from_response(response: reqwest::Response) -> crate::ChatError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    crate::ChatError::Request {
        message: detail_message(status, &body),
    }
}

pub(crate) fn detail_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .unwrap_or_else(|| format!("request failed with status {status}"))
}

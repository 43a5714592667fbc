use std::time::Duration;

use reqwest::Client;
use tracing::warn;

use crate::controller::TurnEvent;
use crate::error::ChatError;
use crate::model::ChatTurnBody;
use crate::stream;

const CHAT_PATH: &str = "/llama_stack/chat";

/// Client for the streaming chat endpoint.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    read_timeout: Option<Duration>,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            read_timeout: None,
        }
    }

    /// Bound each read of the response stream. Off by default: with no
    /// deadline a stalled stream keeps the turn loading indefinitely.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Run one chat turn to completion, emitting `Delta` events for each
    /// content fragment and exactly one terminal event afterwards, whatever
    /// the exit path.
    pub async fn run_turn(&self, body: ChatTurnBody, mut emit: impl FnMut(TurnEvent)) {
        let terminal = match self.stream_turn(&body, &mut emit).await {
            Ok(()) => TurnEvent::Completed,
            Err(err) => {
                warn!("chat turn failed: {err}");
                TurnEvent::Failed(err)
            }
        };
        emit(terminal);
    }

    async fn stream_turn(
        &self,
        body: &ChatTurnBody,
        emit: &mut impl FnMut(TurnEvent),
    ) -> Result<(), ChatError> {
        let url = format!("{}{}", self.base_url, CHAT_PATH);

        let response = self.client.post(&url).json(body).send().await?;
        if !response.status().is_success() {
            return Err(super::error_from_response(response).await);
        }

        stream::pump(response.bytes_stream(), self.read_timeout, |text| {
            emit(TurnEvent::Delta(text))
        })
        .await
    }
}

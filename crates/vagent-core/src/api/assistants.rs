use reqwest::Client;

use crate::error::ChatError;
use crate::model::{Assistant, AssistantComponents};

/// Read-only client for the assistant directory endpoints.
#[derive(Clone)]
pub struct AssistantClient {
    client: Client,
    base_url: String,
}

impl AssistantClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the ordered assistant list.
    pub async fn list_assistants(&self) -> Result<Vec<Assistant>, ChatError> {
        let url = format!("{}/virtual_assistants/", self.base_url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(super::error_from_response(response).await);
        }

        Ok(response.json().await?)
    }

    /// Fetch the component bundle (model server, knowledge bases, tools)
    /// for one assistant.
    pub async fn get_components(
        &self,
        assistant_id: &str,
    ) -> Result<AssistantComponents, ChatError> {
        let url = format!(
            "{}/virtual_assistants/{}/components",
            self.base_url, assistant_id
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(super::error_from_response(response).await);
        }

        Ok(response.json().await?)
    }
}

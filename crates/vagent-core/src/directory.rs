//! Read-only view over the assistant directory, plus the fetch state the
//! UI renders from.
//!
//! Failure semantics follow the product: a failed assistant-list fetch
//! clears the list rather than showing a stale one after a failure signal;
//! a failed components fetch clears the detail pane; a successful components
//! fetch replaces the previous bundle wholesale, never merges.

use crate::error::ChatError;
use crate::model::{Assistant, AssistantComponents};

#[derive(Debug, Default)]
pub struct DirectoryState {
    pub assistants: Vec<Assistant>,
    pub components: Option<AssistantComponents>,
    /// Assistant id the current `components` value (or in-flight fetch)
    /// belongs to.
    components_for: Option<String>,
    pub error: Option<String>,
}

impl DirectoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_assistants(&mut self, result: Result<Vec<Assistant>, ChatError>) {
        match result {
            Ok(list) => {
                self.assistants = list;
                self.error = None;
            }
            Err(err) => {
                self.assistants.clear();
                self.error = Some(format!("could not load assistants: {err}"));
            }
        }
    }

    /// Record that a components fetch for `id` is underway. Any response
    /// still in flight for another assistant becomes stale.
    pub fn begin_components_fetch(&mut self, id: &str) {
        self.components_for = Some(id.to_string());
    }

    /// Fold a components fetch result back in. A response for an assistant
    /// that is no longer the selected one is discarded.
    pub fn apply_components(&mut self, id: &str, result: Result<AssistantComponents, ChatError>) {
        if self.components_for.as_deref() != Some(id) {
            return;
        }
        match result {
            Ok(components) => {
                self.components = Some(components);
            }
            Err(err) => {
                self.components = None;
                self.error = Some(format!("could not load assistant components: {err}"));
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&Assistant> {
        self.assistants.get(index)
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.assistants.iter().position(|a| a.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelServer;

    fn assistant(id: &str) -> Assistant {
        Assistant {
            id: id.to_string(),
            name: format!("assistant {id}"),
            prompt: String::new(),
            model_name: "granite".to_string(),
        }
    }

    fn components(model_name: &str) -> AssistantComponents {
        AssistantComponents {
            model_server: ModelServer {
                id: None,
                name: None,
                provider_name: None,
                model_name: Some(model_name.to_string()),
                endpoint_url: None,
            },
            knowledge_bases: vec![],
            tools: vec![],
        }
    }

    #[test]
    fn test_list_fetch_error_clears_assistants() {
        let mut directory = DirectoryState::new();
        directory.apply_assistants(Ok(vec![assistant("a"), assistant("b")]));
        assert_eq!(directory.assistants.len(), 2);

        directory.apply_assistants(Err(ChatError::Stream("down".to_string())));
        assert!(directory.assistants.is_empty());
        assert!(directory.error.is_some());
    }

    #[test]
    fn test_components_replaced_wholesale_on_success() {
        let mut directory = DirectoryState::new();

        directory.begin_components_fetch("a");
        directory.apply_components("a", Ok(components("model-a")));

        directory.begin_components_fetch("b");
        directory.apply_components("b", Ok(components("model-b")));

        let current = directory.components.as_ref().unwrap();
        assert_eq!(current.model_server.model_name.as_deref(), Some("model-b"));
    }

    #[test]
    fn test_components_cleared_on_failure() {
        let mut directory = DirectoryState::new();
        directory.begin_components_fetch("a");
        directory.apply_components("a", Ok(components("model-a")));

        directory.begin_components_fetch("b");
        directory.apply_components(
            "b",
            Err(ChatError::Request {
                message: "not found".to_string(),
            }),
        );

        assert!(directory.components.is_none());
        assert!(directory.error.is_some());
    }

    #[test]
    fn test_stale_components_response_is_discarded() {
        let mut directory = DirectoryState::new();
        directory.begin_components_fetch("a");
        // Selection moved on before the first fetch resolved.
        directory.begin_components_fetch("b");

        directory.apply_components("a", Ok(components("model-a")));
        assert!(directory.components.is_none());

        directory.apply_components("b", Ok(components("model-b")));
        let current = directory.components.as_ref().unwrap();
        assert_eq!(current.model_server.model_name.as_deref(), Some("model-b"));
    }

    #[test]
    fn test_position_of_finds_assistant() {
        let mut directory = DirectoryState::new();
        directory.apply_assistants(Ok(vec![assistant("a"), assistant("b")]));
        assert_eq!(directory.position_of("b"), Some(1));
        assert_eq!(directory.position_of("missing"), None);
    }
}

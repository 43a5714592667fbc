//! Data model shared between the UI and the API clients.
//!
//! The directory types (`Assistant`, `AssistantComponents`) mirror what the
//! backend returns and are read-only once fetched. The transcript types
//! (`Message`, `ChatRole`) are owned by the controller. The wire types
//! (`ChatTurnBody`, `WireMessage`) are the exact shape the streaming chat
//! endpoint expects.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A virtual assistant as listed by the directory endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Assistant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub prompt: String,
    pub model_name: String,
}

/// Per-assistant component bundle, fetched when an assistant is selected
/// and replaced wholesale on every selection change.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantComponents {
    pub model_server: ModelServer,
    #[serde(default)]
    pub knowledge_bases: Vec<KnowledgeBase>,
    #[serde(default)]
    pub tools: Vec<ToolInfo>,
}

/// Serving endpoint backing an assistant's model. The backend emits nulls
/// for servers it could not resolve, so every field is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelServer {
    pub id: Option<String>,
    pub name: Option<String>,
    pub provider_name: Option<String>,
    pub model_name: Option<String>,
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeBase {
    pub id: String,
    pub name: String,
    pub version: String,
    pub embedding_model: String,
    pub vector_db_name: String,
    pub is_external: bool,
    pub source: Option<String>,
    /// Opaque ingestion settings, carried through without interpretation.
    pub source_configuration: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolInfo {
    pub id: String,
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub endpoint_url: Option<String>,
    /// Opaque tool settings, carried through without interpretation.
    pub configuration: Option<Value>,
}

/// Who authored a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry in the conversation transcript. Ordering is insertion order;
/// the id is generated locally and unique per message.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id,
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request body for the streaming chat endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurnBody {
    pub virtual_assistant_id: String,
    pub messages: Vec<WireMessage>,
}

/// A transcript entry reduced to the wire form the backend expects.
/// `parts` is a forward-compatibility slot and is always empty.
#[derive(Debug, Clone, Serialize)]
pub struct WireMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub parts: Vec<Value>,
}

impl WireMessage {
    pub fn from_message(message: &Message) -> Self {
        Self {
            id: message.id,
            role: message.role,
            content: message.content.clone(),
            parts: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_message_serializes_with_empty_parts() {
        let message = Message::user("hello");
        let wire = WireMessage::from_message(&message);
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");
        assert_eq!(json["parts"], serde_json::json!([]));
        assert_eq!(json["id"], message.id.to_string());
    }

    #[test]
    fn test_turn_body_uses_camel_case_assistant_id() {
        let body = ChatTurnBody {
            virtual_assistant_id: "va-1".to_string(),
            messages: vec![],
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["virtualAssistantId"], "va-1");
        assert!(json["messages"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_components_deserializes_with_null_fields() {
        let raw = r#"{
            "model_server": {
                "id": null,
                "name": "vllm",
                "provider_name": "vllm",
                "model_name": "granite-3.1-8b",
                "endpoint_url": null
            },
            "knowledge_bases": [{
                "id": "kb-1",
                "name": "banking-faq",
                "version": "1",
                "embedding_model": "all-MiniLM-L6-v2",
                "vector_db_name": "banking_faq_v1",
                "is_external": false,
                "source": null,
                "source_configuration": null
            }],
            "tools": []
        }"#;

        let components: AssistantComponents = serde_json::from_str(raw).unwrap();
        assert_eq!(components.model_server.name.as_deref(), Some("vllm"));
        assert_eq!(components.knowledge_bases.len(), 1);
        assert!(!components.knowledge_bases[0].is_external);
        assert!(components.tools.is_empty());
    }
}

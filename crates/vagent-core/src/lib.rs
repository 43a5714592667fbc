pub mod api;
pub mod config;
pub mod controller;
pub mod directory;
pub mod error;
pub mod model;
pub mod stream;

// Re-export main types for convenience
pub use api::{AssistantClient, ChatClient};
pub use config::Config;
pub use controller::{ChatController, TurnEvent};
pub use directory::DirectoryState;
pub use error::ChatError;
pub use model::{Assistant, AssistantComponents, ChatRole, ChatTurnBody, Message};

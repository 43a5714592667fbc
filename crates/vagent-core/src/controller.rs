//! Conversation state machine for the chat pane.
//!
//! The controller owns the transcript, the input buffer, the selected
//! assistant and the loading/error flags. A turn mutates state only through
//! [`ChatController::begin_turn`] and [`ChatController::apply_event`], so
//! every transition happens on the single UI task; the network side of a
//! turn runs elsewhere and reports back as [`TurnEvent`]s.

use uuid::Uuid;

use crate::error::ChatError;
use crate::model::{ChatTurnBody, Message, WireMessage};

/// Events produced by an in-flight turn, applied in arrival order.
/// A turn emits zero or more `Delta`s followed by exactly one terminal
/// event (`Completed` or `Failed`).
#[derive(Debug)]
pub enum TurnEvent {
    /// One fragment of assistant text.
    Delta(String),
    /// The transport signalled end-of-stream.
    Completed,
    /// The turn failed; the transcript is left as-is.
    Failed(ChatError),
}

/// Per-turn accumulator: one fixed assistant-message id allocated when the
/// turn starts, content growing by append only.
#[derive(Debug)]
struct ActiveTurn {
    message_id: Uuid,
    content: String,
}

#[derive(Debug, Default)]
pub struct ChatController {
    /// Current input buffer; edited directly by the frontend.
    pub input: String,
    transcript: Vec<Message>,
    assistant_id: Option<String>,
    loading: bool,
    error: Option<String>,
    turn: Option<ActiveTurn>,
}

impl ChatController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn assistant_id(&self) -> Option<&str> {
        self.assistant_id.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Select the assistant future turns are addressed to. Returns true when
    /// the selection actually changed. `clear_transcript` drops the prior
    /// conversation; the product keeps it by default, so this is driven by
    /// configuration rather than hard-coded either way.
    pub fn select_assistant(&mut self, id: &str, clear_transcript: bool) -> bool {
        if self.assistant_id.as_deref() == Some(id) {
            return false;
        }
        self.assistant_id = Some(id.to_string());
        if clear_transcript {
            self.transcript.clear();
        }
        true
    }

    /// Start a turn from the current input.
    ///
    /// Silent no-op (returns `None`, state untouched) when the trimmed input
    /// is empty, no assistant is selected, or a turn is already in flight.
    /// Otherwise the user message is appended to the transcript immediately
    /// (optimistic, never retracted), the input clears, loading is set, the
    /// previous error clears, and the returned body carries the assistant id
    /// plus the full transcript in wire form.
    pub fn begin_turn(&mut self) -> Option<ChatTurnBody> {
        if self.loading {
            return None;
        }
        let text = self.input.trim();
        if text.is_empty() {
            return None;
        }
        let assistant_id = self.assistant_id.clone()?;

        self.transcript.push(Message::user(text));
        self.input.clear();
        self.loading = true;
        self.error = None;
        self.turn = Some(ActiveTurn {
            message_id: Uuid::new_v4(),
            content: String::new(),
        });

        Some(ChatTurnBody {
            virtual_assistant_id: assistant_id,
            messages: self
                .transcript
                .iter()
                .map(WireMessage::from_message)
                .collect(),
        })
    }

    /// Fold one turn event into the transcript. Completion and failure both
    /// clear the loading flag regardless of how the turn ended.
    pub fn apply_event(&mut self, event: TurnEvent) {
        match event {
            TurnEvent::Delta(text) => self.apply_delta(&text),
            TurnEvent::Completed => self.finish_turn(None),
            TurnEvent::Failed(err) => self.finish_turn(Some(err.to_string())),
        }
    }

    /// Abort an in-flight turn: partial assistant content stays in the
    /// transcript, loading clears, and the banner notes the cancellation.
    pub fn cancel_turn(&mut self) {
        if self.loading {
            self.finish_turn(Some("response cancelled".to_string()));
        }
    }

    fn apply_delta(&mut self, text: &str) {
        let (message_id, content) = match self.turn.as_mut() {
            Some(turn) => {
                turn.content.push_str(text);
                (turn.message_id, turn.content.clone())
            }
            // A late delta after the turn was torn down has nowhere to go.
            None => return,
        };
        self.reconcile(message_id, content);
    }

    /// Replace-last-by-id so replaying the same accumulated content never
    /// duplicates the assistant message; append on the first fragment. This
    /// keeps at most one assistant message per turn, and nothing is visible
    /// until the first fragment arrives.
    fn reconcile(&mut self, message_id: Uuid, content: String) {
        match self.transcript.last_mut() {
            Some(last) if last.id == message_id => last.content = content,
            _ => self.transcript.push(Message::assistant(message_id, content)),
        }
    }

    fn finish_turn(&mut self, error: Option<String>) {
        self.loading = false;
        self.turn = None;
        self.error = error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChatRole;

    fn controller_with_assistant() -> ChatController {
        let mut controller = ChatController::new();
        controller.select_assistant("va-1", false);
        controller
    }

    #[test]
    fn test_begin_turn_appends_user_message_synchronously() {
        let mut controller = controller_with_assistant();
        controller.input = "hello".to_string();

        let body = controller.begin_turn().expect("turn should start");

        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(controller.transcript()[0].role, ChatRole::User);
        assert_eq!(controller.transcript()[0].content, "hello");
        assert!(controller.is_loading());
        assert!(controller.input.is_empty());
        // The request carries the just-appended user message.
        assert_eq!(body.virtual_assistant_id, "va-1");
        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].content, "hello");
        assert!(body.messages[0].parts.is_empty());
    }

    #[test]
    fn test_begin_turn_noop_on_whitespace_input() {
        let mut controller = controller_with_assistant();
        controller.input = "   \t ".to_string();

        assert!(controller.begin_turn().is_none());
        assert!(controller.transcript().is_empty());
        assert!(!controller.is_loading());
        // Input is left alone so the user can keep editing.
        assert_eq!(controller.input, "   \t ");
    }

    #[test]
    fn test_begin_turn_noop_without_assistant() {
        let mut controller = ChatController::new();
        controller.input = "hello".to_string();

        assert!(controller.begin_turn().is_none());
        assert!(controller.transcript().is_empty());
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_begin_turn_noop_while_loading() {
        let mut controller = controller_with_assistant();
        controller.input = "first".to_string();
        controller.begin_turn().unwrap();

        controller.input = "second".to_string();
        assert!(controller.begin_turn().is_none());
        assert_eq!(controller.transcript().len(), 1);
    }

    #[test]
    fn test_deltas_accumulate_into_single_assistant_message() {
        let mut controller = controller_with_assistant();
        controller.input = "hi".to_string();
        controller.begin_turn().unwrap();

        controller.apply_event(TurnEvent::Delta("Hel".to_string()));
        controller.apply_event(TurnEvent::Delta("lo".to_string()));
        controller.apply_event(TurnEvent::Completed);

        let transcript = controller.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].role, ChatRole::Assistant);
        assert_eq!(transcript[1].content, "Hello");
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_no_assistant_message_until_first_delta() {
        let mut controller = controller_with_assistant();
        controller.input = "hi".to_string();
        controller.begin_turn().unwrap();

        assert_eq!(controller.transcript().len(), 1);
        controller.apply_event(TurnEvent::Completed);
        assert_eq!(controller.transcript().len(), 1);
    }

    #[test]
    fn test_reconcile_is_idempotent_for_same_turn_id() {
        let mut controller = controller_with_assistant();
        controller.input = "hi".to_string();
        controller.begin_turn().unwrap();

        let id = Uuid::new_v4();
        controller.reconcile(id, "partial".to_string());
        controller.reconcile(id, "partial".to_string());

        assert_eq!(controller.transcript().len(), 2);
        assert_eq!(controller.transcript()[1].content, "partial");
    }

    #[test]
    fn test_failed_turn_keeps_user_message_and_clears_loading() {
        let mut controller = controller_with_assistant();
        controller.input = "hi".to_string();
        controller.begin_turn().unwrap();

        controller.apply_event(TurnEvent::Failed(ChatError::Request {
            message: "model unavailable".to_string(),
        }));

        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(controller.transcript()[0].role, ChatRole::User);
        assert!(!controller.is_loading());
        assert_eq!(controller.last_error(), Some("model unavailable"));
    }

    #[test]
    fn test_failure_after_partial_content_keeps_partial_message() {
        let mut controller = controller_with_assistant();
        controller.input = "hi".to_string();
        controller.begin_turn().unwrap();

        controller.apply_event(TurnEvent::Delta("par".to_string()));
        controller.apply_event(TurnEvent::Failed(ChatError::Stream(
            "connection reset".to_string(),
        )));

        assert_eq!(controller.transcript().len(), 2);
        assert_eq!(controller.transcript()[1].content, "par");
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_late_delta_after_turn_end_is_ignored() {
        let mut controller = controller_with_assistant();
        controller.input = "hi".to_string();
        controller.begin_turn().unwrap();
        controller.apply_event(TurnEvent::Completed);

        controller.apply_event(TurnEvent::Delta("stray".to_string()));
        assert_eq!(controller.transcript().len(), 1);
    }

    #[test]
    fn test_cancel_turn_keeps_partial_content() {
        let mut controller = controller_with_assistant();
        controller.input = "hi".to_string();
        controller.begin_turn().unwrap();
        controller.apply_event(TurnEvent::Delta("par".to_string()));

        controller.cancel_turn();

        assert!(!controller.is_loading());
        assert_eq!(controller.transcript()[1].content, "par");
        assert_eq!(controller.last_error(), Some("response cancelled"));
    }

    #[test]
    fn test_switching_assistant_keeps_transcript_by_default() {
        let mut controller = controller_with_assistant();
        controller.input = "hi".to_string();
        controller.begin_turn().unwrap();
        controller.apply_event(TurnEvent::Completed);

        assert!(controller.select_assistant("va-2", false));
        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(controller.assistant_id(), Some("va-2"));
    }

    #[test]
    fn test_switching_assistant_can_clear_transcript() {
        let mut controller = controller_with_assistant();
        controller.input = "hi".to_string();
        controller.begin_turn().unwrap();
        controller.apply_event(TurnEvent::Completed);

        assert!(controller.select_assistant("va-2", true));
        assert!(controller.transcript().is_empty());
    }

    #[test]
    fn test_reselecting_same_assistant_is_not_a_change() {
        let mut controller = controller_with_assistant();
        assert!(!controller.select_assistant("va-1", true));
        assert_eq!(controller.assistant_id(), Some("va-1"));
    }

    #[test]
    fn test_new_turn_gets_fresh_assistant_message_id() {
        let mut controller = controller_with_assistant();

        controller.input = "one".to_string();
        controller.begin_turn().unwrap();
        controller.apply_event(TurnEvent::Delta("a".to_string()));
        controller.apply_event(TurnEvent::Completed);

        controller.input = "two".to_string();
        controller.begin_turn().unwrap();
        controller.apply_event(TurnEvent::Delta("b".to_string()));
        controller.apply_event(TurnEvent::Completed);

        let transcript = controller.transcript();
        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript[1].content, "a");
        assert_eq!(transcript[3].content, "b");
        assert_ne!(transcript[1].id, transcript[3].id);
    }
}

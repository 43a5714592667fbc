use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use vagent_core::api::{AssistantClient, ChatClient};
use vagent_core::controller::{ChatController, TurnEvent};
use vagent_core::directory::DirectoryState;
use vagent_core::model::Assistant;
use vagent_core::{AssistantComponents, ChatError, Config};

use crate::tui::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Assistants,
    Chat,
    Input,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: FocusPane,

    // Assistant directory
    pub directory: DirectoryState,
    pub assistant_state: ListState,
    pub show_components: bool,

    // Conversation state
    pub controller: ChatController,
    pub input_cursor: usize, // cursor position in the input buffer
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations

    // In-flight turn (aborted on cancel)
    pub turn_task: Option<JoinHandle<()>>,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Clients and config
    pub assistant_client: AssistantClient,
    pub chat_client: ChatClient,
    pub config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        let assistant_client = AssistantClient::new(&config.api_base);
        let chat_client =
            ChatClient::new(&config.api_base).with_read_timeout(config.read_timeout());

        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            focus: FocusPane::Assistants,

            directory: DirectoryState::new(),
            assistant_state: ListState::default(),
            show_components: false,

            controller: ChatController::new(),
            input_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            turn_task: None,

            animation_frame: 0,

            assistant_client,
            chat_client,
            config,
        }
    }

    /// Kick off (or refresh) the assistant list fetch; the result comes back
    /// through the main loop as an `AppEvent::Assistants`.
    pub fn refresh_assistants(&self, tx: &UnboundedSender<AppEvent>) {
        let client = self.assistant_client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = client.list_assistants().await;
            let _ = tx.send(AppEvent::Assistants(result));
        });
    }

    pub fn on_assistants(
        &mut self,
        result: Result<Vec<Assistant>, ChatError>,
        tx: &UnboundedSender<AppEvent>,
    ) {
        self.directory.apply_assistants(result);
        if self.directory.assistants.is_empty() {
            self.assistant_state.select(None);
            return;
        }

        match self.controller.assistant_id().map(str::to_string) {
            // Keep the highlight on the already-active assistant.
            Some(current) => {
                self.assistant_state.select(self.directory.position_of(&current));
            }
            // Initial selection: the configured default when it exists in
            // the directory, else the first listed assistant.
            None => {
                let index = self
                    .config
                    .default_assistant
                    .as_deref()
                    .and_then(|id| self.directory.position_of(id))
                    .unwrap_or(0);
                self.select_assistant(index, tx);
            }
        }
    }

    /// Make the assistant at `index` the active one. An actual selection
    /// change triggers exactly one components fetch for the new id.
    pub fn select_assistant(&mut self, index: usize, tx: &UnboundedSender<AppEvent>) {
        let Some(assistant) = self.directory.get(index) else {
            return;
        };
        let id = assistant.id.clone();
        self.assistant_state.select(Some(index));

        if !self
            .controller
            .select_assistant(&id, self.config.clear_on_switch)
        {
            return;
        }

        self.directory.begin_components_fetch(&id);
        let client = self.assistant_client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = client.get_components(&id).await;
            let _ = tx.send(AppEvent::Components {
                assistant_id: id,
                result,
            });
        });
    }

    pub fn on_components(
        &mut self,
        assistant_id: &str,
        result: Result<AssistantComponents, ChatError>,
    ) {
        self.directory.apply_components(assistant_id, result);
    }

    /// Submit the current input as a chat turn. The controller enforces the
    /// preconditions (non-empty input, assistant selected, not loading), so
    /// this is a silent no-op when they fail.
    pub fn submit(&mut self, tx: &UnboundedSender<AppEvent>) {
        let Some(body) = self.controller.begin_turn() else {
            return;
        };
        self.input_cursor = 0;
        self.scroll_chat_to_bottom();

        let client = self.chat_client.clone();
        let tx = tx.clone();
        self.turn_task = Some(tokio::spawn(async move {
            client
                .run_turn(body, |event| {
                    let _ = tx.send(AppEvent::Turn(event));
                })
                .await;
        }));
    }

    pub fn on_turn_event(&mut self, event: TurnEvent) {
        let terminal = !matches!(event, TurnEvent::Delta(_));
        self.controller.apply_event(event);
        if terminal {
            self.turn_task = None;
        }
        self.scroll_chat_to_bottom();
    }

    /// Abort the in-flight turn. Whatever content already arrived stays in
    /// the transcript.
    pub fn cancel_turn(&mut self) {
        if let Some(task) = self.turn_task.take() {
            task.abort();
        }
        self.controller.cancel_turn();
    }

    pub fn selected_assistant(&self) -> Option<&Assistant> {
        self.assistant_state
            .selected()
            .and_then(|i| self.directory.get(i))
    }

    // Assistant list navigation
    pub fn assistant_nav_down(&mut self) {
        let len = self.directory.assistants.len();
        if len > 0 {
            let i = self.assistant_state.selected().unwrap_or(0);
            self.assistant_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn assistant_nav_up(&mut self) {
        let i = self.assistant_state.selected().unwrap_or(0);
        self.assistant_state.select(Some(i.saturating_sub(1)));
    }

    pub fn tick_animation(&mut self) {
        if self.controller.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_chat_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1);
    }

    pub fn scroll_chat_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    /// Scroll the chat so the newest content (or "Thinking...") is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in self.controller.transcript() {
            total_lines += 1; // Role line ("You:" or "AI:")
            for line in msg.content.lines() {
                // Use character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1; // Empty line still takes one line
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // Blank line after message
        }

        if self.controller.is_loading() {
            total_lines += 2; // "AI:" + "Thinking..."
        }

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.chat_scroll = total_lines.saturating_sub(visible_height);
        } else {
            self.chat_scroll = 0;
        }
    }
}

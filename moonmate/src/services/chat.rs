//! Chat panel state
//!
//! Holds the transcript of one chat interaction over a text selection and
//! turns diff-style service responses into classified lines for display.
//! Nothing here is persisted.

use super::text_improvement::{
    ApiError, TextImprovementRequest, TextImprovementResponse, TextImprover,
};
use uuid::Uuid;

/// Header line marker produced by the improvement service
const SUGGESTION_HEADER: &str = "Suggested Edit";

/// Placeholder text shown while a response is pending
pub const LOADING_TEXT: &str = "Thinking...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// The quoted selection the conversation is about
    SelectedText,
    /// A prompt typed by the user
    Prompt,
    /// A service answer, or an inline error
    Response,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub kind: MessageKind,
    pub is_loading: bool,
    /// For responses: the prompt they answer
    pub in_reply_to: Option<Uuid>,
    /// For prompts: the selection they were sent with
    pub selection: Option<String>,
}

impl ChatMessage {
    fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            kind,
            is_loading: false,
            in_reply_to: None,
            selection: None,
        }
    }

    /// Placeholder response for a prompt still in flight
    pub fn loading(prompt_id: Uuid) -> Self {
        Self {
            is_loading: true,
            in_reply_to: Some(prompt_id),
            ..Self::new(MessageKind::Response, LOADING_TEXT)
        }
    }

    pub fn label(&self) -> &'static str {
        match self.kind {
            MessageKind::SelectedText => "Selected Text",
            MessageKind::Prompt => "You",
            MessageKind::Response => "",
        }
    }
}

/// A request that has been recorded in the transcript but not answered yet
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub prompt_id: Uuid,
    pub request: TextImprovementRequest,
}

/// Transcript of one chat sidebar
#[derive(Debug, Default)]
pub struct ChatSession {
    selected_text: Option<String>,
    messages: Vec<ChatMessage>,
    in_flight: usize,
}

impl ChatSession {
    pub fn new(selected_text: Option<String>) -> Self {
        Self {
            selected_text,
            ..Self::default()
        }
    }

    pub fn set_selected_text(&mut self, selected_text: Option<String>) {
        self.selected_text = selected_text;
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selected_text.as_deref().filter(|s| !s.is_empty())
    }

    /// Raw messages in the order they were appended
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// True while at least one request is awaiting its response
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Whether the send control should be enabled for `prompt`
    pub fn can_send(&self, prompt: &str) -> bool {
        !prompt.is_empty() && self.selected_text().is_some() && !self.is_loading()
    }

    /// Record `prompt` and return the request to send.
    ///
    /// Returns `None` when there is no selection or the prompt is empty.
    pub fn begin_request(&mut self, prompt: &str) -> Option<PendingRequest> {
        if prompt.is_empty() {
            return None;
        }
        let selected = self.selected_text()?.to_string();

        let mut message = ChatMessage::new(MessageKind::Prompt, prompt);
        message.selection = Some(selected.clone());
        let prompt_id = message.id;
        self.messages.push(message);
        self.in_flight += 1;

        Some(PendingRequest {
            prompt_id,
            request: TextImprovementRequest::new(selected, prompt),
        })
    }

    /// Append the outcome of `pending` as a response message.
    ///
    /// Failures become an inline "Error: ..." response.
    pub fn complete(
        &mut self,
        pending: &PendingRequest,
        result: Result<TextImprovementResponse, ApiError>,
    ) -> &ChatMessage {
        let text = match result {
            Ok(response) => response.improved_text,
            Err(e) => {
                tracing::warn!("Text improvement request failed: {}", e);
                format!("Error: {}", e)
            }
        };

        let mut message = ChatMessage::new(MessageKind::Response, text);
        message.in_reply_to = Some(pending.prompt_id);
        self.in_flight = self.in_flight.saturating_sub(1);

        let index = self.messages.len();
        self.messages.push(message);
        &self.messages[index]
    }

    /// Send `prompt` about the current selection and wait for the answer
    pub async fn send<C: TextImprover>(
        &mut self,
        client: &C,
        prompt: &str,
    ) -> Option<&ChatMessage> {
        let pending = self.begin_request(prompt)?;
        let result = client.improve(&pending.request).await;
        Some(self.complete(&pending, result))
    }

    /// Messages in display order: the selection first, then each prompt
    /// followed by its response, most recent prompt first. A prompt still
    /// waiting for its answer is followed by a loading placeholder.
    pub fn ordered_messages(&self) -> Vec<ChatMessage> {
        let mut ordered = Vec::with_capacity(self.messages.len() + 1);

        if let Some(selected) = self.selected_text() {
            ordered.push(ChatMessage::new(MessageKind::SelectedText, selected));
        }

        let prompts = self
            .messages
            .iter()
            .filter(|m| m.kind == MessageKind::Prompt)
            .rev();

        for prompt in prompts {
            ordered.push(prompt.clone());
            match self
                .messages
                .iter()
                .find(|m| m.kind == MessageKind::Response && m.in_reply_to == Some(prompt.id))
            {
                Some(response) => ordered.push(response.clone()),
                None => ordered.push(ChatMessage::loading(prompt.id)),
            }
        }

        ordered
    }
}

/// One classified line of a diff-style response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    Header(String),
    Removed(String),
    Added(String),
    Context(String),
}

/// Split a response into header, removed, added and context lines
pub fn render_response(text: &str) -> Vec<DiffLine> {
    text.lines()
        .map(|line| {
            if line.starts_with(SUGGESTION_HEADER) {
                DiffLine::Header(line.to_string())
            } else if let Some(rest) = line.strip_prefix('-') {
                DiffLine::Removed(strip_marker_space(rest).to_string())
            } else if let Some(rest) = line.strip_prefix('+') {
                DiffLine::Added(strip_marker_space(rest).to_string())
            } else {
                DiffLine::Context(line.to_string())
            }
        })
        .collect()
}

fn strip_marker_space(rest: &str) -> &str {
    rest.strip_prefix(' ').unwrap_or(rest)
}

//! Services module
//!
//! Application logic that sits between the UI layer and storage.

pub mod autosave;
pub mod chat;
pub mod search;
pub mod text_improvement;
pub mod view_model;

pub use autosave::AutosaveService;
pub use chat::{render_response, ChatMessage, ChatSession, DiffLine, MessageKind};
pub use search::{find_matches, SearchState};
pub use text_improvement::{
    ApiError, HttpTextImprover, MockTextImprover, TextImprovementClient, TextImprovementRequest,
    TextImprovementResponse, TextImprover,
};
pub use view_model::{DocumentViewModel, LayoutState, ViewModelEvent};

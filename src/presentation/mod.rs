//! Display-ready forms of conversation state. No business logic lives here.

pub mod formatting;
pub mod html;
pub mod view;

pub use html::TranscriptRenderer;
pub use view::*;

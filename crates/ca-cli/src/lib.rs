//! Terminal interface for the compliance agent

mod render;
mod ui;


pub use render::{RATE_LIMIT_MESSAGE, failure_message, render_event};
pub use ui::{display_banner, handle_input_with_history, print_help};

// Re-export core types
pub use ca_core::{Error, Result};

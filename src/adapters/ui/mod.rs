//! Terminal UI adapters: manage menu, confirmation prompt, progress spinner.

pub mod progress;
pub mod tui;

pub use tui::{InquireConfirm, TuiInputPort};

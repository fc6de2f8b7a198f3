//! TUI module: Terminal User Interface using Ratatui.
//!
//! A single screen with:
//! - The health form and its status line
//! - The risk assessment result
//! - The dataset disclaimer

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::MedicalTheme;

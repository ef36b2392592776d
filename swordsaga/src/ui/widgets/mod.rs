//! TUI widgets for the Sword Saga roller

pub mod dice_roll;
pub mod history;
pub mod staging;
pub mod status_bar;

pub use dice_roll::{DiceRollWidget, ResolutionLine};
pub use history::HistoryWidget;
pub use staging::StagingWidget;
pub use status_bar::{HotkeyBarWidget, StatusBarWidget};

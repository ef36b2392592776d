//! UI module for the Sword Saga TUI

pub mod layout;
pub mod render;
pub mod theme;
pub mod widgets;

//! Component trait - Interface for UI components
//!
//! A component owns its presentation state (focus, scroll position), turns
//! key events into Actions and draws itself. Domain state lives in the App
//! and is handed to components at draw time.

use crate::action::Action;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

/// Trait for UI components
///
/// 1. `handle_key_event` - map a key to an Action, without touching domain state
/// 2. `update` - react to an Action, optionally returning a follow-up Action
/// 3. `draw` - render into the given area
pub trait Component {
    /// Called once before the first frame
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    /// Pure rendering; no state changes besides clamping scroll offsets
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::modes::PlaybackSpeed;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    TogglePause,
    /// Advance one tick while paused
    Step,
    Speed(PlaybackSpeed),
    SpeedUp,
    SlowDown,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Char(' ') => KeyAction::TogglePause,
            KeyCode::Char('.') | KeyCode::Right => KeyAction::Step,

            KeyCode::Char('1') => KeyAction::Speed(PlaybackSpeed::Slow),
            KeyCode::Char('2') => KeyAction::Speed(PlaybackSpeed::Normal),
            KeyCode::Char('3') => KeyAction::Speed(PlaybackSpeed::Fast),
            KeyCode::Char('4') => KeyAction::Speed(PlaybackSpeed::Max),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => KeyAction::SpeedUp,
            KeyCode::Char('-') | KeyCode::Down => KeyAction::SlowDown,

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ui::message::AppMessage;

/// Global bindings, consulted after the active view declined the key.
pub struct InputHandler;

impl InputHandler {
    pub fn handle_key(key: KeyEvent) -> Option<AppMessage> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppMessage::Quit),
            (KeyCode::Char('q'), _) => Some(AppMessage::Quit),
            (KeyCode::Char(' '), _) => Some(AppMessage::TogglePlayPause),
            (KeyCode::Char('n'), _) => Some(AppMessage::NextTrack),
            (KeyCode::Char('p'), _) => Some(AppMessage::PreviousTrack),
            (KeyCode::Char('+'), _) => Some(AppMessage::VolumeUp),
            (KeyCode::Char('='), _) => Some(AppMessage::VolumeUp),
            (KeyCode::Char('-'), _) => Some(AppMessage::VolumeDown),
            (KeyCode::Char('H'), _) => Some(AppMessage::SeekBackward),
            (KeyCode::Char('L'), _) => Some(AppMessage::SeekForward),
            (KeyCode::Char('m'), _) => Some(AppMessage::ToggleMute),
            (KeyCode::Esc, _) => Some(AppMessage::GoBack),
            (KeyCode::Backspace, _) => Some(AppMessage::GoBack),
            (KeyCode::Char('['), _) => Some(AppMessage::GoBack),
            (KeyCode::Char(']'), _) => Some(AppMessage::GoForward),
            (KeyCode::Char('d'), _) => Some(AppMessage::GoHome),
            (KeyCode::Tab, _) => Some(AppMessage::ToggleFocus),
            (KeyCode::BackTab, _) => Some(AppMessage::ToggleFocus),
            (KeyCode::Char('u'), _) => Some(AppMessage::ToggleProfileMenu),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn transport_and_history_keys() {
        assert_eq!(InputHandler::handle_key(key(KeyCode::Char(' '))), Some(AppMessage::TogglePlayPause));
        assert_eq!(InputHandler::handle_key(key(KeyCode::Char('n'))), Some(AppMessage::NextTrack));
        assert_eq!(InputHandler::handle_key(key(KeyCode::Esc)), Some(AppMessage::GoBack));
        assert_eq!(InputHandler::handle_key(key(KeyCode::Char(']'))), Some(AppMessage::GoForward));
        assert_eq!(
            InputHandler::handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(AppMessage::Quit)
        );
        assert_eq!(InputHandler::handle_key(key(KeyCode::Char('z'))), None);
    }
}

//! Engine-facing input mapping, independent of the rendering code: raw key
//! events become discrete board commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use demine_core::Direction;

/// Discrete commands the terminal layer feeds into the board engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Reveal,
    ToggleFlag,
    NewGame,
    Quit,
}

/// Maps a raw key event to a command; unbound keys map to nothing.
pub fn map_key(event: KeyEvent) -> Option<Command> {
    if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    match event.code {
        KeyCode::Left | KeyCode::Char('h') => Some(Command::Move(Direction::Left)),
        KeyCode::Down | KeyCode::Char('j') => Some(Command::Move(Direction::Down)),
        KeyCode::Up | KeyCode::Char('k') => Some(Command::Move(Direction::Up)),
        KeyCode::Right | KeyCode::Char('l') => Some(Command::Move(Direction::Right)),
        KeyCode::Char(' ') => Some(Command::Reveal),
        KeyCode::Char('f') => Some(Command::ToggleFlag),
        KeyCode::Char('r') => Some(Command::NewGame),
        KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_vim_keys_move() {
        for (code, direction) in [
            (KeyCode::Left, Direction::Left),
            (KeyCode::Char('h'), Direction::Left),
            (KeyCode::Down, Direction::Down),
            (KeyCode::Char('j'), Direction::Down),
            (KeyCode::Up, Direction::Up),
            (KeyCode::Char('k'), Direction::Up),
            (KeyCode::Right, Direction::Right),
            (KeyCode::Char('l'), Direction::Right),
        ] {
            assert_eq!(map_key(key(code)), Some(Command::Move(direction)));
        }
    }

    #[test]
    fn action_keys_map_to_commands() {
        assert_eq!(map_key(key(KeyCode::Char(' '))), Some(Command::Reveal));
        assert_eq!(map_key(key(KeyCode::Char('f'))), Some(Command::ToggleFlag));
        assert_eq!(map_key(key(KeyCode::Char('r'))), Some(Command::NewGame));
        assert_eq!(map_key(key(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
    }

    #[test]
    fn unbound_keys_map_to_nothing() {
        assert_eq!(map_key(key(KeyCode::Char('x'))), None);
        assert_eq!(map_key(key(KeyCode::Esc)), None);
    }
}

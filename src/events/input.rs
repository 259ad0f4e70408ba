//! Key bindings and their matching against key events.

use crate::config::KeyBindings;
use crate::error::{Error, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::str::FromStr;

/// Simplified key representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    Other,
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        match code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Other,
        }
    }
}

/// A parsed binding such as `Ctrl+q`, `Enter`, or `]`.
///
/// Shift is not part of a binding: it already shows in the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key: Key,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyBinding {
    /// Check whether a key event triggers this binding.
    ///
    /// A lowercase letter binding also accepts the uppercase letter.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if event.modifiers.contains(KeyModifiers::CONTROL) != self.ctrl
            || event.modifiers.contains(KeyModifiers::ALT) != self.alt
        {
            return false;
        }

        match (self.key, Key::from(event.code)) {
            (Key::Char(expected), Key::Char(actual)) => {
                actual == expected || actual == expected.to_ascii_uppercase()
            }
            (expected, actual) => expected == actual,
        }
    }
}

impl FromStr for KeyBinding {
    type Err = Error;

    fn from_str(binding: &str) -> Result<Self> {
        let mut ctrl = false;
        let mut alt = false;
        let mut key = None;

        // `+` alone, or as the last part of `Ctrl++`, is the plus key.
        let (modifiers, last) = match binding.strip_suffix("++") {
            Some(prefix) => (prefix, "+"),
            None if binding == "+" => ("", "+"),
            None => match binding.rsplit_once('+') {
                Some((prefix, last)) => (prefix, last),
                None => ("", binding),
            },
        };

        for part in modifiers.split('+').filter(|p| !p.is_empty()) {
            match part.to_lowercase().as_str() {
                "ctrl" => ctrl = true,
                "alt" => alt = true,
                other => {
                    return Err(Error::config(format!(
                        "Unknown modifier '{other}' in key binding '{binding}'"
                    )));
                }
            }
        }

        let mut chars = last.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            key = Some(Key::Char(c));
        }

        let key = match key {
            Some(key) => key,
            None => match last.to_lowercase().as_str() {
                "enter" => Key::Enter,
                "esc" | "escape" => Key::Escape,
                "backspace" => Key::Backspace,
                "delete" | "del" => Key::Delete,
                "tab" => Key::Tab,
                "backtab" => Key::BackTab,
                "space" => Key::Char(' '),
                "up" => Key::Up,
                "down" => Key::Down,
                "left" => Key::Left,
                "right" => Key::Right,
                "home" => Key::Home,
                "end" => Key::End,
                "pageup" => Key::PageUp,
                "pagedown" => Key::PageDown,
                s if s.starts_with('f') => s[1..]
                    .parse::<u8>()
                    .map(Key::F)
                    .map_err(|_| Error::config(format!("Unknown key in binding '{binding}'")))?,
                _ => return Err(Error::config(format!("Unknown key in binding '{binding}'"))),
            },
        };

        Ok(Self { key, ctrl, alt })
    }
}

/// Key bindings resolved from configuration.
#[derive(Debug, Clone)]
pub struct Keymap {
    pub quit: KeyBinding,
    pub help: KeyBinding,
    pub up: KeyBinding,
    pub down: KeyBinding,
    pub select: KeyBinding,
    pub back: KeyBinding,
    pub refresh: KeyBinding,
    pub add: KeyBinding,
    pub edit: KeyBinding,
    pub delete: KeyBinding,
    pub pay: KeyBinding,
    pub next_page: KeyBinding,
    pub prev_page: KeyBinding,
    pub bind_user: KeyBinding,
    pub bind_group: KeyBinding,
}

impl TryFrom<&KeyBindings> for Keymap {
    type Error = Error;

    fn try_from(bindings: &KeyBindings) -> Result<Self> {
        Ok(Self {
            quit: bindings.quit.parse()?,
            help: bindings.help.parse()?,
            up: bindings.up.parse()?,
            down: bindings.down.parse()?,
            select: bindings.select.parse()?,
            back: bindings.back.parse()?,
            refresh: bindings.refresh.parse()?,
            add: bindings.add.parse()?,
            edit: bindings.edit.parse()?,
            delete: bindings.delete.parse()?,
            pay: bindings.pay.parse()?,
            next_page: bindings.next_page.parse()?,
            prev_page: bindings.prev_page.parse()?,
            bind_user: bindings.bind_user.parse()?,
            bind_group: bindings.bind_group.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_parse_bindings() {
        let b: KeyBinding = "Ctrl+q".parse().unwrap();
        assert_eq!(b.key, Key::Char('q'));
        assert!(b.ctrl);

        assert_eq!("Enter".parse::<KeyBinding>().unwrap().key, Key::Enter);
        assert_eq!("]".parse::<KeyBinding>().unwrap().key, Key::Char(']'));
        assert_eq!("+".parse::<KeyBinding>().unwrap().key, Key::Char('+'));
        assert_eq!("F5".parse::<KeyBinding>().unwrap().key, Key::F(5));

        let plus: KeyBinding = "Alt++".parse().unwrap();
        assert_eq!(plus.key, Key::Char('+'));
        assert!(plus.alt);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("Hyper+x".parse::<KeyBinding>().is_err());
        assert!("Launch".parse::<KeyBinding>().is_err());
    }

    #[test]
    fn test_matching() {
        let q: KeyBinding = "q".parse().unwrap();
        assert!(q.matches(&press(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(q.matches(&press(KeyCode::Char('Q'), KeyModifiers::SHIFT)));
        assert!(!q.matches(&press(KeyCode::Char('q'), KeyModifiers::CONTROL)));

        let help: KeyBinding = "?".parse().unwrap();
        assert!(help.matches(&press(KeyCode::Char('?'), KeyModifiers::SHIFT)));
    }

    #[test]
    fn test_default_keymap_parses() {
        let keymap = Keymap::try_from(&KeyBindings::default()).unwrap();
        assert_eq!(keymap.back.key, Key::Escape);
        assert_eq!(keymap.next_page.key, Key::Char(']'));
    }
}

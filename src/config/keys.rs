use std::collections::HashMap;

use color_eyre::{Result, eyre::bail};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use serde::{Deserialize, Deserializer, de};

use crate::{action::Action, app::Mode};

/// Key sequences bound to actions, per input mode.
#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct KeyBindings(pub HashMap<Mode, HashMap<Vec<KeyEvent>, Action>>);

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = HashMap::<Mode, HashMap<String, Action>>::deserialize(deserializer)?;

        let mut keybindings = HashMap::with_capacity(parsed.len());
        for (mode, inner) in parsed {
            let mut bindings = HashMap::with_capacity(inner.len());
            for (keys, action) in inner {
                let sequence = parse_key_sequence(&keys).map_err(de::Error::custom)?;
                bindings.insert(sequence, action);
            }
            keybindings.insert(mode, bindings);
        }
        Ok(KeyBindings(keybindings))
    }
}

/// Parses one key like `ctrl-z`, `enter` or `?` (without the angle brackets).
pub fn parse_key_event(raw: &str) -> Result<KeyEvent> {
    let lower = raw.to_ascii_lowercase();
    let (remaining, modifiers) = extract_modifiers(&lower);
    // single characters keep their case so `G` and `g` stay distinct
    let remaining = if remaining.chars().count() == 1 {
        &raw[raw.len() - remaining.len()..]
    } else {
        remaining
    };
    parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
    let mut modifiers = KeyModifiers::empty();
    let mut current = raw;

    loop {
        match current {
            rest if rest.starts_with("ctrl-") => {
                modifiers.insert(KeyModifiers::CONTROL);
                current = &rest[5..];
            }
            rest if rest.starts_with("alt-") => {
                modifiers.insert(KeyModifiers::ALT);
                current = &rest[4..];
            }
            rest if rest.starts_with("shift-") => {
                modifiers.insert(KeyModifiers::SHIFT);
                current = &rest[6..];
            }
            _ => break,
        };
    }

    (current, modifiers)
}

fn parse_key_code_with_modifiers(raw: &str, mut modifiers: KeyModifiers) -> Result<KeyEvent> {
    let code = match raw {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "backtab" => {
            modifiers.insert(KeyModifiers::SHIFT);
            KeyCode::BackTab
        }
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        "hyphen" | "minus" => KeyCode::Char('-'),
        f if f.len() > 1 && f.starts_with('f') && f[1..].parse::<u8>().is_ok() => {
            KeyCode::F(f[1..].parse::<u8>()?)
        }
        c if c.chars().count() == 1 => {
            let mut c = c.chars().next().unwrap_or_default();
            if modifiers.contains(KeyModifiers::SHIFT) {
                c = c.to_ascii_uppercase();
            }
            // the case of the character already carries shift
            modifiers.remove(KeyModifiers::SHIFT);
            KeyCode::Char(c)
        }
        _ => bail!("unable to parse key {raw:?}"),
    };
    Ok(KeyEvent::new(code, modifiers))
}

/// Renders a key the way it is written in the config, for the help line.
pub fn key_event_to_string(key_event: &KeyEvent) -> String {
    let code = match key_event.code {
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => "backtab".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::F(n) => format!("f{n}"),
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Esc => "esc".to_string(),
        _ => "?".to_string(),
    };

    let mut parts = Vec::new();
    if key_event.modifiers.intersects(KeyModifiers::CONTROL) {
        parts.push("ctrl");
    }
    if key_event.modifiers.intersects(KeyModifiers::ALT) {
        parts.push("alt");
    }
    parts.push(&code);
    parts.join("-")
}

/// Parses `<ctrl-x><g>` style sequences.
pub fn parse_key_sequence(raw: &str) -> Result<Vec<KeyEvent>> {
    if raw.chars().filter(|c| *c == '>').count() != raw.chars().filter(|c| *c == '<').count() {
        bail!("unbalanced brackets in key sequence {raw:?}");
    }
    let raw = raw
        .strip_prefix('<')
        .and_then(|r| r.strip_suffix('>'))
        .unwrap_or(raw);

    raw.split("><")
        .map(|seq| {
            seq.strip_prefix('<')
                .or_else(|| seq.strip_suffix('>'))
                .unwrap_or(seq)
        })
        .map(parse_key_event)
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_simple_keys() {
        assert_eq!(
            parse_key_event("a").unwrap(),
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty())
        );
        assert_eq!(
            parse_key_event("enter").unwrap(),
            KeyEvent::new(KeyCode::Enter, KeyModifiers::empty())
        );
        assert_eq!(
            parse_key_event("?").unwrap(),
            KeyEvent::new(KeyCode::Char('?'), KeyModifiers::empty())
        );
        assert_eq!(
            parse_key_event("G").unwrap(),
            KeyEvent::new(KeyCode::Char('G'), KeyModifiers::empty())
        );
        assert_eq!(
            parse_key_event("f5").unwrap(),
            KeyEvent::new(KeyCode::F(5), KeyModifiers::empty())
        );
    }

    #[test]
    fn test_with_modifiers() {
        assert_eq!(
            parse_key_event("Ctrl-z").unwrap(),
            KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL)
        );
        assert_eq!(
            parse_key_event("ctrl-alt-a").unwrap(),
            KeyEvent::new(
                KeyCode::Char('a'),
                KeyModifiers::CONTROL | KeyModifiers::ALT
            )
        );
    }

    #[test]
    fn test_shift_folds_into_char() {
        assert_eq!(
            parse_key_event("shift-g").unwrap(),
            KeyEvent::new(KeyCode::Char('G'), KeyModifiers::empty())
        );
    }

    #[test]
    fn test_invalid_keys() {
        assert!(parse_key_event("invalid-key").is_err());
        assert!(parse_key_sequence("<ctrl-a").is_err());
    }

    #[test]
    fn test_sequences() {
        assert_eq!(
            parse_key_sequence("<g><ctrl-x>").unwrap(),
            vec![
                KeyEvent::new(KeyCode::Char('g'), KeyModifiers::empty()),
                KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL),
            ]
        );
    }

    #[test]
    fn test_key_event_to_string() {
        assert_eq!(
            key_event_to_string(&KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL)),
            "ctrl-z"
        );
        assert_eq!(
            key_event_to_string(&KeyEvent::new(KeyCode::Char('1'), KeyModifiers::empty())),
            "1"
        );
    }
}

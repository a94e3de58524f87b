use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Name a key event in the binding vocabulary: `j`, `J`, `/`, `space`,
/// `enter`, `ctrl d`, `meta b`, `page down`, `f5`...
///
/// Shift is folded into the character for printable keys (`J`, `?`). Returns
/// `None` for keys with no name (media keys, bare modifiers).
pub fn key_name(key: &KeyEvent) -> Option<String> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    let base = match key.code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) if ctrl || alt => c.to_ascii_lowercase().to_string(),
        KeyCode::Char(c) => return Some(c.to_string()),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => return Some("shift tab".to_string()),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "page up".to_string(),
        KeyCode::PageDown => "page down".to_string(),
        KeyCode::F(n) => format!("f{}", n),
        _ => return None,
    };

    let mut name = String::new();
    if shift && !matches!(key.code, KeyCode::Char(_)) {
        name.push_str("shift ");
    }
    if alt {
        name.push_str("meta ");
    }
    if ctrl {
        name.push_str("ctrl ");
    }
    name.push_str(&base);
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn name(code: KeyCode, modifiers: KeyModifiers) -> Option<String> {
        key_name(&key(code, modifiers))
    }

    #[test]
    fn test_plain_characters() {
        assert_eq!(name(KeyCode::Char('j'), KeyModifiers::NONE).as_deref(), Some("j"));
        assert_eq!(name(KeyCode::Char('J'), KeyModifiers::SHIFT).as_deref(), Some("J"));
        assert_eq!(name(KeyCode::Char('?'), KeyModifiers::SHIFT).as_deref(), Some("?"));
        assert_eq!(name(KeyCode::Char(' '), KeyModifiers::NONE).as_deref(), Some("space"));
    }

    #[test]
    fn test_modifiers() {
        assert_eq!(
            name(KeyCode::Char('d'), KeyModifiers::CONTROL).as_deref(),
            Some("ctrl d")
        );
        assert_eq!(name(KeyCode::Char('b'), KeyModifiers::ALT).as_deref(), Some("meta b"));
        assert_eq!(
            name(KeyCode::Up, KeyModifiers::SHIFT).as_deref(),
            Some("shift up")
        );
        assert_eq!(
            name(KeyCode::BackTab, KeyModifiers::SHIFT).as_deref(),
            Some("shift tab")
        );
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(name(KeyCode::Enter, KeyModifiers::NONE).as_deref(), Some("enter"));
        assert_eq!(name(KeyCode::Esc, KeyModifiers::NONE).as_deref(), Some("esc"));
        assert_eq!(
            name(KeyCode::PageDown, KeyModifiers::NONE).as_deref(),
            Some("page down")
        );
        assert_eq!(name(KeyCode::F(5), KeyModifiers::NONE).as_deref(), Some("f5"));
        assert_eq!(name(KeyCode::Null, KeyModifiers::NONE), None);
    }
}

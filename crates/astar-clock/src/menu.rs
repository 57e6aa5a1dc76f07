//! Menu actions and their keyboard accelerators.

use winit::keyboard::{Key, NamedKey};

use crate::options::NumeralStyle;
use crate::theme::ThemePreference;

/// A user command from the window's menu.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MenuAction {
    SetTheme(ThemePreference),
    SetNumerals(NumeralStyle),
    ToggleSmoothSeconds,
    ToggleMinorTicks,
    Close,
}

impl MenuAction {
    /// Maps a pressed logical key to its accelerator, ignoring case.
    ///
    /// | key       | action              |
    /// |-----------|---------------------|
    /// | `L` `D` `A` | theme light / dark / auto |
    /// | `1` `2` `3` | numerals arabic / roman / none |
    /// | `S`       | toggle smooth seconds |
    /// | `M`       | toggle minor ticks  |
    /// | `Esc` `Q` | close               |
    pub fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::Named(NamedKey::Escape) => Some(MenuAction::Close),
            Key::Character(s) => match s.to_ascii_lowercase().as_str() {
                "l" => Some(MenuAction::SetTheme(ThemePreference::Light)),
                "d" => Some(MenuAction::SetTheme(ThemePreference::Dark)),
                "a" => Some(MenuAction::SetTheme(ThemePreference::Auto)),
                "1" => Some(MenuAction::SetNumerals(NumeralStyle::Arabic)),
                "2" => Some(MenuAction::SetNumerals(NumeralStyle::Roman)),
                "3" => Some(MenuAction::SetNumerals(NumeralStyle::None)),
                "s" => Some(MenuAction::ToggleSmoothSeconds),
                "m" => Some(MenuAction::ToggleMinorTicks),
                "q" => Some(MenuAction::Close),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(s: &str) -> Key {
        Key::Character(s.into())
    }

    #[test]
    fn theme_accelerators() {
        assert_eq!(MenuAction::from_key(&ch("l")), Some(MenuAction::SetTheme(ThemePreference::Light)));
        assert_eq!(MenuAction::from_key(&ch("D")), Some(MenuAction::SetTheme(ThemePreference::Dark)));
        assert_eq!(MenuAction::from_key(&ch("a")), Some(MenuAction::SetTheme(ThemePreference::Auto)));
    }

    #[test]
    fn numeral_accelerators() {
        assert_eq!(MenuAction::from_key(&ch("2")), Some(MenuAction::SetNumerals(NumeralStyle::Roman)));
        assert_eq!(MenuAction::from_key(&ch("3")), Some(MenuAction::SetNumerals(NumeralStyle::None)));
    }

    #[test]
    fn escape_and_q_close() {
        assert_eq!(MenuAction::from_key(&Key::Named(NamedKey::Escape)), Some(MenuAction::Close));
        assert_eq!(MenuAction::from_key(&ch("q")), Some(MenuAction::Close));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(MenuAction::from_key(&ch("z")), None);
        assert_eq!(MenuAction::from_key(&Key::Named(NamedKey::Enter)), None);
    }
}

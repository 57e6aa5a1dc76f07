//! Light / dark / auto theming.

use astar_engine::paint::Color;
use astar_engine::window::Theme;

/// Theme the user asked for.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the platform.
    #[default]
    Auto,
}

impl ThemePreference {
    /// Theme to force on window decorations; `None` lets the platform decide.
    pub fn window_theme(self) -> Option<Theme> {
        match self {
            ThemePreference::Light => Some(Theme::Light),
            ThemePreference::Dark => Some(Theme::Dark),
            ThemePreference::Auto => None,
        }
    }
}

/// Theme actually used for a frame. Derived, never stored.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EffectiveTheme {
    Light,
    Dark,
}

impl From<Theme> for EffectiveTheme {
    fn from(t: Theme) -> Self {
        match t {
            Theme::Light => EffectiveTheme::Light,
            Theme::Dark => EffectiveTheme::Dark,
        }
    }
}

/// Holds the theme preference and resolves it per frame.
#[derive(Debug, Default)]
pub struct ThemeController {
    preference: ThemePreference,
}

impl ThemeController {
    pub fn new(preference: ThemePreference) -> Self {
        Self { preference }
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    /// Returns `true` if the preference changed.
    pub fn set_theme(&mut self, preference: ThemePreference) -> bool {
        if self.preference == preference {
            return false;
        }
        log::info!("theme: {:?} -> {:?}", self.preference, preference);
        self.preference = preference;
        true
    }

    /// Resolves `Auto` against the theme the host reports right now. Hosts
    /// that report nothing resolve to light.
    pub fn effective_theme(&self, host: Option<Theme>) -> EffectiveTheme {
        match self.preference {
            ThemePreference::Light => EffectiveTheme::Light,
            ThemePreference::Dark => EffectiveTheme::Dark,
            ThemePreference::Auto => host.map_or(EffectiveTheme::Light, EffectiveTheme::from),
        }
    }
}

/// Colors of one theme.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub face_fill: Color,
    pub face_stroke: Color,
    pub foreground: Color,
    pub cap: Color,
}

impl Palette {
    pub fn for_theme(theme: EffectiveTheme) -> Self {
        match theme {
            EffectiveTheme::Dark => Self {
                background: Color::from_argb_u32(0xFF1C1E22),
                face_fill: Color::from_argb_u32(0xFF22252A),
                face_stroke: Color::from_argb_u32(0xFF444A52),
                foreground: Color::WHITE,
                cap: Color::from_argb_u32(0xFFFF4500), // OrangeRed
            },
            EffectiveTheme::Light => Self {
                background: Color::from_argb_u32(0xFFF3F3F3),
                face_fill: Color::from_argb_u32(0xFFFFFFFF),
                face_stroke: Color::from_argb_u32(0xFFCCCCCC),
                foreground: Color::BLACK,
                cap: Color::from_argb_u32(0xFFDC143C), // Crimson
            },
        }
    }
}

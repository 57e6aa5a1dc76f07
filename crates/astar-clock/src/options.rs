//! User-adjustable face style.

use astar_engine::paint::Color;

/// How hour positions are labelled.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum NumeralStyle {
    #[default]
    Arabic,
    Roman,
    None,
}

const ROMAN: [&str; 12] = [
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII",
];

impl NumeralStyle {
    /// Label for `hour` in `1..=12`; `None` for the bare style or out-of-range hours.
    pub fn label(self, hour: u32) -> Option<String> {
        if !(1..=12).contains(&hour) {
            return None;
        }
        match self {
            NumeralStyle::Arabic => Some(hour.to_string()),
            NumeralStyle::Roman => Some(ROMAN[(hour - 1) as usize].to_string()),
            NumeralStyle::None => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NumeralStyle::Arabic => "arabic",
            NumeralStyle::Roman => "roman",
            NumeralStyle::None => "none",
        }
    }
}

/// Style knobs read by the face renderer on every repaint.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClockStyleOptions {
    /// Sweep the second hand continuously instead of ticking once a second.
    pub smooth_seconds: bool,
    pub show_minor_ticks: bool,
    pub numeral_style: NumeralStyle,
    pub second_hand_color: Color,
    /// Overrides the theme's tick and numeral color.
    pub foreground: Option<Color>,
}

impl Default for ClockStyleOptions {
    fn default() -> Self {
        Self {
            smooth_seconds: true,
            show_minor_ticks: false,
            numeral_style: NumeralStyle::Arabic,
            second_hand_color: Color::WHITE,
            foreground: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roman_four_is_iv() {
        assert_eq!(NumeralStyle::Roman.label(4).as_deref(), Some("IV"));
        assert_eq!(NumeralStyle::Roman.label(9).as_deref(), Some("IX"));
        assert_eq!(NumeralStyle::Roman.label(12).as_deref(), Some("XII"));
    }

    #[test]
    fn arabic_four_is_4() {
        assert_eq!(NumeralStyle::Arabic.label(4).as_deref(), Some("4"));
        assert_eq!(NumeralStyle::Arabic.label(12).as_deref(), Some("12"));
    }

    #[test]
    fn none_style_has_no_labels() {
        assert!((1..=12).all(|h| NumeralStyle::None.label(h).is_none()));
    }

    #[test]
    fn out_of_range_hours_have_no_label() {
        assert_eq!(NumeralStyle::Arabic.label(0), None);
        assert_eq!(NumeralStyle::Roman.label(13), None);
    }

    #[test]
    fn defaults_match_startup_state() {
        let o = ClockStyleOptions::default();
        assert!(o.smooth_seconds);
        assert!(!o.show_minor_ticks);
        assert_eq!(o.numeral_style, NumeralStyle::Arabic);
        assert_eq!(o.second_hand_color, Color::WHITE);
        assert_eq!(o.foreground, None);
    }
}

//! Clock face geometry.
//!
//! Everything here is a pure function of `RenderFrame`: the face appends
//! primitives to a [`DrawList`] and never touches the window or the GPU.

use std::f32::consts::{FRAC_PI_2, TAU};

use chrono::{NaiveTime, Timelike};

use astar_engine::coords::{Rect, Vec2};
use astar_engine::paint::Color;
use astar_engine::scene::{Border, DrawList, LineCap, ZIndex};
use astar_engine::text::FontId;

use crate::options::{ClockStyleOptions, NumeralStyle};
use crate::theme::{EffectiveTheme, Palette};

// ── layers ────────────────────────────────────────────────────────────────

pub const Z_FACE: ZIndex = ZIndex(0);
pub const Z_TICKS: ZIndex = ZIndex(1);
pub const Z_NUMERALS: ZIndex = ZIndex(2);
pub const Z_HANDS: ZIndex = ZIndex(3);
pub const Z_CAP: ZIndex = ZIndex(4);

// ── proportions (fractions of the face radius) ────────────────────────────

const RADIUS_OF_MIN_SIDE: f32 = 0.45;

const MAJOR_TICK_INNER: f32 = 0.78;
const MINOR_TICK_INNER: f32 = 0.88;
const TICK_OUTER: f32 = 0.95;
const MAJOR_TICK_WIDTH: f32 = 2.0;
const MINOR_TICK_WIDTH: f32 = 1.0;

const NUMERAL_RADIUS: f32 = 0.66;
const NUMERAL_SIZE_OF_RADIUS: f32 = 0.12;
const NUMERAL_MIN_SIZE: f32 = 10.0;

const HOUR_HAND: (f32, f32) = (0.55, 8.0);
const MINUTE_HAND: (f32, f32) = (0.75, 5.0);
const SECOND_HAND: (f32, f32) = (0.85, 1.5);

const FACE_STROKE_WIDTH: f32 = 2.0;
const CAP_RADIUS: f32 = 3.0;

const HOUR_HAND_COLOR: Color = Color::RED;
const MINUTE_HAND_COLOR: Color = Color::BLUE;

/// Everything one repaint needs. Built fresh by the shell for every frame.
#[derive(Debug, Copy, Clone)]
pub struct RenderFrame<'a> {
    pub bounds: Rect,
    pub now: NaiveTime,
    pub options: &'a ClockStyleOptions,
    pub theme: EffectiveTheme,
}

/// Hand positions as fractions of a full turn, `0.0` at twelve o'clock.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HandUnits {
    pub hour: f32,
    pub minute: f32,
    pub second: f32,
}

impl HandUnits {
    /// Decomposes `now`. With `smooth` the second hand includes milliseconds;
    /// minutes and hours always carry the fraction of the unit below them.
    pub fn from_time(now: NaiveTime, smooth: bool) -> Self {
        // chrono reports a leap second as nanosecond >= 1e9.
        let millis = (now.nanosecond() / 1_000_000).min(999);

        let seconds = if smooth {
            now.second() as f32 + millis as f32 / 1000.0
        } else {
            now.second() as f32
        };
        let minutes = now.minute() as f32 + seconds / 60.0;
        let hours = (now.hour() % 12) as f32 + minutes / 60.0;

        Self {
            hour: hours / 12.0,
            minute: minutes / 60.0,
            second: seconds / 60.0,
        }
    }
}

/// Screen angle of a unit, with `0.0` pointing up and turning clockwise.
#[inline]
pub fn unit_angle(unit: f32) -> f32 {
    unit * TAU - FRAC_PI_2
}

/// Box used to center a numeral: `(width, height)` for `len` characters.
pub fn numeral_box(len: usize, font_size: f32) -> (f32, f32) {
    let factor = match len {
        0 | 1 => 0.6,
        2 => 1.0,
        _ => 1.2,
    };
    (font_size * factor, font_size)
}

/// Draws the analog clock face.
#[derive(Debug, Default, Copy, Clone)]
pub struct ClockFace {
    font: FontId,
}

impl ClockFace {
    pub fn new(font: FontId) -> Self {
        Self { font }
    }

    pub fn draw(&self, list: &mut DrawList, frame: &RenderFrame<'_>) {
        let bounds = if frame.bounds.is_finite() {
            frame.bounds.normalized()
        } else {
            Rect::default()
        };

        let palette = Palette::for_theme(frame.theme);
        let foreground = frame.options.foreground.unwrap_or(palette.foreground);
        let center = bounds.center();
        let radius = RADIUS_OF_MIN_SIDE * bounds.min_side();

        list.push_circle(
            Z_FACE,
            center,
            radius,
            palette.face_fill,
            Some(Border::new(FACE_STROKE_WIDTH, palette.face_stroke)),
        );

        self.draw_ticks(list, center, radius, foreground, frame.options.show_minor_ticks);
        self.draw_numerals(list, center, radius, foreground, frame.options.numeral_style);

        let units = HandUnits::from_time(frame.now, frame.options.smooth_seconds);
        let hands = [
            (units.hour, HOUR_HAND, HOUR_HAND_COLOR),
            (units.minute, MINUTE_HAND, MINUTE_HAND_COLOR),
            (units.second, SECOND_HAND, frame.options.second_hand_color),
        ];
        for (unit, (length, width), color) in hands {
            let tip = center + Vec2::from_angle(unit_angle(unit)) * (length * radius);
            list.push_line(Z_HANDS, center, tip, width, color, LineCap::Round);
        }

        list.push_solid_circle(Z_CAP, center, CAP_RADIUS, palette.cap);
    }

    fn draw_ticks(&self, list: &mut DrawList, center: Vec2, radius: f32, color: Color, minor: bool) {
        for i in 0..60u32 {
            let major = i % 5 == 0;
            if !major && !minor {
                continue;
            }
            let (inner, width) = if major {
                (MAJOR_TICK_INNER, MAJOR_TICK_WIDTH)
            } else {
                (MINOR_TICK_INNER, MINOR_TICK_WIDTH)
            };
            let dir = Vec2::from_angle(unit_angle(i as f32 / 60.0));
            list.push_line(
                Z_TICKS,
                center + dir * (inner * radius),
                center + dir * (TICK_OUTER * radius),
                width,
                color,
                LineCap::Butt,
            );
        }
    }

    fn draw_numerals(
        &self,
        list: &mut DrawList,
        center: Vec2,
        radius: f32,
        color: Color,
        style: NumeralStyle,
    ) {
        let font_size = (NUMERAL_SIZE_OF_RADIUS * radius).max(NUMERAL_MIN_SIZE);

        for hour in 1..=12u32 {
            let Some(label) = style.label(hour) else { continue };
            let anchor =
                center + Vec2::from_angle(unit_angle(hour as f32 / 12.0)) * (NUMERAL_RADIUS * radius);
            let (w, h) = numeral_box(label.chars().count(), font_size);
            let origin = anchor - Vec2::new(w / 2.0, h / 2.0);
            list.push_text(Z_NUMERALS, label, self.font, font_size, color, origin);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astar_engine::scene::DrawCmd;

    const EPS: f32 = 1e-4;

    fn hms_milli(h: u32, m: u32, s: u32, ms: u32) -> NaiveTime {
        NaiveTime::from_hms_milli_opt(h, m, s, ms).unwrap()
    }

    fn draw(options: &ClockStyleOptions, now: NaiveTime, bounds: Rect) -> DrawList {
        let mut list = DrawList::new();
        let frame = RenderFrame { bounds, now, options, theme: EffectiveTheme::Dark };
        ClockFace::default().draw(&mut list, &frame);
        list
    }

    fn square() -> Rect {
        Rect::new(0.0, 0.0, 400.0, 400.0)
    }

    fn lines(list: &DrawList, z: ZIndex) -> Vec<astar_engine::scene::LineCmd> {
        list.layer(z)
            .filter_map(|item| match &item.cmd {
                DrawCmd::Line(l) => Some(*l),
                _ => None,
            })
            .collect()
    }

    fn texts(list: &DrawList) -> Vec<String> {
        list.layer(Z_NUMERALS)
            .filter_map(|item| match &item.cmd {
                DrawCmd::Text(t) => Some(t.text.clone()),
                _ => None,
            })
            .collect()
    }

    // ── time decomposition ────────────────────────────────────────────────

    #[test]
    fn three_oclock_hour_unit_is_quarter() {
        let u = HandUnits::from_time(hms_milli(3, 0, 0, 0), false);
        assert!((u.hour - 0.25).abs() < EPS);
        assert!(u.minute.abs() < EPS);
    }

    #[test]
    fn snapped_seconds_drop_millis() {
        let u = HandUnits::from_time(hms_milli(10, 15, 30, 750), false);
        assert!((u.second - 0.5).abs() < EPS);
    }

    #[test]
    fn smooth_seconds_include_millis() {
        let u = HandUnits::from_time(hms_milli(10, 15, 30, 750), true);
        assert!((u.second - 0.5125).abs() < EPS);
    }

    #[test]
    fn afternoon_wraps_to_twelve_hour_dial() {
        let am = HandUnits::from_time(hms_milli(3, 0, 0, 0), false);
        let pm = HandUnits::from_time(hms_milli(15, 0, 0, 0), false);
        assert!((am.hour - pm.hour).abs() < EPS);
    }

    #[test]
    fn minutes_carry_seconds() {
        let u = HandUnits::from_time(hms_milli(0, 30, 30, 0), false);
        assert!((u.minute - 30.5 / 60.0).abs() < EPS);
    }

    #[test]
    fn unit_zero_points_up() {
        let v = Vec2::from_angle(unit_angle(0.0));
        assert!(v.x.abs() < EPS && (v.y + 1.0).abs() < EPS);
    }

    // ── numerals ──────────────────────────────────────────────────────────

    #[test]
    fn arabic_draws_twelve_numerals() {
        let list = draw(&ClockStyleOptions::default(), hms_milli(0, 0, 0, 0), square());
        let labels = texts(&list);
        assert_eq!(labels.len(), 12);
        assert_eq!(labels[3], "4");
    }

    #[test]
    fn roman_uses_roman_labels() {
        let options = ClockStyleOptions { numeral_style: NumeralStyle::Roman, ..Default::default() };
        let list = draw(&options, hms_milli(0, 0, 0, 0), square());
        let labels = texts(&list);
        assert_eq!(labels[3], "IV");
        assert_eq!(labels[11], "XII");
    }

    #[test]
    fn none_style_draws_no_numerals() {
        let options = ClockStyleOptions { numeral_style: NumeralStyle::None, ..Default::default() };
        let list = draw(&options, hms_milli(0, 0, 0, 0), square());
        assert_eq!(list.layer(Z_NUMERALS).count(), 0);
    }

    #[test]
    fn numeral_box_heuristic() {
        let widths: Vec<f32> = [1, 2, 4].iter().map(|&n| numeral_box(n, 20.0).0).collect();
        assert!((widths[0] - 12.0).abs() < EPS);
        assert!((widths[1] - 20.0).abs() < EPS);
        assert!((widths[2] - 24.0).abs() < EPS);
        assert_eq!(numeral_box(3, 20.0).1, 20.0);
    }

    #[test]
    fn numeral_size_has_a_floor() {
        let list = draw(&ClockStyleOptions::default(), hms_milli(0, 0, 0, 0), Rect::new(0.0, 0.0, 40.0, 40.0));
        let size = list
            .layer(Z_NUMERALS)
            .find_map(|item| match &item.cmd {
                DrawCmd::Text(t) => Some(t.size),
                _ => None,
            })
            .unwrap();
        assert_eq!(size, NUMERAL_MIN_SIZE);
    }

    /// `(label, origin, size)` for each numeral on the default square.
    fn numerals(options: &ClockStyleOptions) -> Vec<(String, Vec2, f32)> {
        draw(options, hms_milli(0, 0, 0, 0), square())
            .layer(Z_NUMERALS)
            .filter_map(|item| match &item.cmd {
                DrawCmd::Text(t) => Some((t.text.clone(), t.origin, t.size)),
                _ => None,
            })
            .collect()
    }

    fn assert_near(actual: Vec2, x: f32, y: f32) {
        assert!(
            (actual.x - x).abs() < 1e-3 && (actual.y - y).abs() < 1e-3,
            "expected ({x}, {y}), got ({}, {})",
            actual.x,
            actual.y
        );
    }

    #[test]
    fn numerals_are_centered_on_their_ring() {
        // square 400: center (200, 200), radius 180, font 21.6, ring 118.8
        let numerals = numerals(&ClockStyleOptions::default());
        let (label, origin, size) = &numerals[11];
        assert_eq!(label, "12");
        assert!((size - 21.6).abs() < 1e-3);
        assert_near(*origin, 200.0 - 21.6 * 1.0 / 2.0, 200.0 - 118.8 - 21.6 / 2.0);

        let (label, origin, _) = &numerals[2];
        assert_eq!(label, "3");
        assert_near(*origin, 200.0 + 118.8 - 21.6 * 0.6 / 2.0, 200.0 - 21.6 / 2.0);

        let (label, origin, _) = &numerals[5];
        assert_eq!(label, "6");
        assert_near(*origin, 200.0 - 21.6 * 0.6 / 2.0, 200.0 + 118.8 - 21.6 / 2.0);
    }

    #[test]
    fn wide_roman_numerals_shift_further_left() {
        let options = ClockStyleOptions { numeral_style: NumeralStyle::Roman, ..Default::default() };
        let numerals = numerals(&options);
        let (label, origin, _) = &numerals[2];
        assert_eq!(label, "III");
        assert_near(*origin, 200.0 + 118.8 - 21.6 * 1.2 / 2.0, 200.0 - 21.6 / 2.0);
    }

    // ── ticks ─────────────────────────────────────────────────────────────

    #[test]
    fn major_ticks_only_by_default() {
        let list = draw(&ClockStyleOptions::default(), hms_milli(0, 0, 0, 0), square());
        assert_eq!(lines(&list, Z_TICKS).len(), 12);
    }

    #[test]
    fn minor_ticks_add_up_to_sixty() {
        let options = ClockStyleOptions { show_minor_ticks: true, ..Default::default() };
        let list = draw(&options, hms_milli(0, 0, 0, 0), square());
        let ticks = lines(&list, Z_TICKS);
        assert_eq!(ticks.len(), 60);
        assert_eq!(ticks.iter().filter(|t| t.width == MINOR_TICK_WIDTH).count(), 48);
        assert!(ticks.iter().all(|t| t.cap == LineCap::Butt));
    }

    #[test]
    fn foreground_override_colors_ticks() {
        let options = ClockStyleOptions { foreground: Some(Color::RED), ..Default::default() };
        let list = draw(&options, hms_milli(0, 0, 0, 0), square());
        assert!(lines(&list, Z_TICKS).iter().all(|t| t.color == Color::RED));
    }

    // ── hands + layering ──────────────────────────────────────────────────

    #[test]
    fn hands_have_fixed_colors_and_widths() {
        let options = ClockStyleOptions { second_hand_color: Color::BLACK, ..Default::default() };
        let list = draw(&options, hms_milli(3, 0, 0, 0), square());
        let hands = lines(&list, Z_HANDS);
        assert_eq!(hands.len(), 3);
        assert_eq!((hands[0].color, hands[0].width), (Color::RED, 8.0));
        assert_eq!((hands[1].color, hands[1].width), (Color::BLUE, 5.0));
        assert_eq!((hands[2].color, hands[2].width), (Color::BLACK, 1.5));
        assert!(hands.iter().all(|h| h.cap == LineCap::Round));
    }

    #[test]
    fn hour_hand_points_right_at_three() {
        let list = draw(&ClockStyleOptions::default(), hms_milli(3, 0, 0, 0), square());
        let hour = lines(&list, Z_HANDS)[0];
        // r = 0.45 * 400 = 180, hour hand 0.55r = 99
        assert!((hour.to.x - (200.0 + 99.0)).abs() < 1e-3);
        assert!((hour.to.y - 200.0).abs() < 1e-3);
    }

    #[test]
    fn cap_is_painted_last() {
        let mut list = draw(&ClockStyleOptions::default(), hms_milli(10, 10, 10, 0), square());
        let last = list.iter_in_paint_order().last().unwrap();
        assert_eq!(last.key.z, Z_CAP);
        assert!(matches!(last.cmd, DrawCmd::Circle(_)));
    }

    #[test]
    fn face_uses_theme_palette() {
        let mut list = DrawList::new();
        let options = ClockStyleOptions::default();
        let frame = RenderFrame {
            bounds: square(),
            now: hms_milli(0, 0, 0, 0),
            options: &options,
            theme: EffectiveTheme::Light,
        };
        ClockFace::default().draw(&mut list, &frame);
        let face = list
            .layer(Z_FACE)
            .find_map(|item| match &item.cmd {
                DrawCmd::Circle(c) => Some(*c),
                _ => None,
            })
            .unwrap();
        assert_eq!(face.fill, Color::WHITE);
        assert!((face.radius - 180.0).abs() < 1e-3);
        assert_eq!(face.border.map(|b| b.width), Some(2.0));
    }

    // ── degenerate bounds ─────────────────────────────────────────────────

    #[test]
    fn zero_bounds_do_not_fail() {
        let list = draw(&ClockStyleOptions::default(), hms_milli(12, 0, 0, 0), Rect::default());
        assert!(!list.is_empty());
        assert!(list.items().iter().all(|item| match &item.cmd {
            DrawCmd::Line(l) => l.from.is_finite() && l.to.is_finite(),
            DrawCmd::Circle(c) => c.center.is_finite(),
            DrawCmd::Text(t) => t.origin.is_finite(),
        }));
    }

    #[test]
    fn non_finite_bounds_collapse() {
        let list = draw(
            &ClockStyleOptions::default(),
            hms_milli(12, 0, 0, 0),
            Rect::new(f32::NAN, 0.0, 100.0, 100.0),
        );
        assert!(!list.is_empty());
    }
}

//! AStar analog clock.
//!
//! The face is a pure function of `(bounds, time, options, theme)`; timers
//! and the window shell decide when to call it.

pub mod app;
pub mod face;
pub mod menu;
pub mod options;
pub mod scheduler;
pub mod shell;
pub mod theme;
pub mod time_source;
pub mod title;

pub use app::ClockApp;
pub use options::{ClockStyleOptions, NumeralStyle};
pub use theme::{EffectiveTheme, ThemePreference};

use anyhow::Result;
use winit::dpi::LogicalSize;

use astar_engine::device::GpuInit;
use astar_engine::logging::{init_logging, LoggingConfig};
use astar_engine::text::FontSystem;
use astar_engine::window::{Runtime, RuntimeConfig};

use crate::options::ClockStyleOptions;
use crate::shell::ClockShell;
use crate::theme::ThemePreference;
use crate::time_source::LocalClock;

/// Top-level clock application builder.
///
/// ```rust,ignore
/// ClockApp::new()
///     .title("Analog Clock")
///     .size(480.0, 480.0)
///     .font(load_font())
///     .theme(ThemePreference::Auto)
///     .run()?;
/// ```
pub struct ClockApp {
    title:   String,
    width:   f64,
    height:  f64,
    fonts:   Vec<Vec<u8>>,
    style:   ClockStyleOptions,
    theme:   ThemePreference,
    logging: Option<LoggingConfig>,
    gpu:     GpuInit,
}

impl ClockApp {
    pub fn new() -> Self {
        Self {
            title:   "Analog Clock".to_string(),
            width:   480.0,
            height:  480.0,
            fonts:   Vec::new(),
            style:   ClockStyleOptions::default(),
            theme:   ThemePreference::Auto,
            logging: None,
            gpu:     GpuInit::default(),
        }
    }

    /// Initial window title; replaced by the live title once the window shows.
    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width  = width;
        self.height = height;
        self
    }

    /// Register font bytes for the numerals. The first font that loads wins.
    pub fn font(mut self, data: Vec<u8>) -> Self {
        self.fonts.push(data);
        self
    }

    pub fn style(mut self, style: ClockStyleOptions) -> Self {
        self.style = style;
        self
    }

    pub fn theme(mut self, theme: ThemePreference) -> Self {
        self.theme = theme;
        self
    }

    /// Initialise `env_logger` with `config` when the app starts.
    pub fn logging(mut self, config: LoggingConfig) -> Self {
        self.logging = Some(config);
        self
    }

    pub fn gpu(mut self, gpu: GpuInit) -> Self {
        self.gpu = gpu;
        self
    }

    /// Loads every registered font, skipping the ones that fail.
    fn load_fonts(&self) -> FontSystem {
        let mut fonts = FontSystem::new();
        for (i, bytes) in self.fonts.iter().enumerate() {
            if let Err(e) = fonts.load_font(bytes) {
                log::warn!("failed to load font #{i}: {e}");
            }
        }
        if fonts.is_empty() {
            log::warn!("no usable font; numerals will not be drawn");
        }
        fonts
    }

    /// Opens the clock window and blocks until it closes.
    pub fn run(self) -> Result<()> {
        if let Some(config) = self.logging.clone() {
            init_logging(config);
        }

        let fonts = self.load_fonts();
        let shell = ClockShell::new(self.style, self.theme, fonts, LocalClock);

        let config = RuntimeConfig {
            title:        self.title,
            initial_size: LogicalSize::new(self.width, self.height),
        };

        log::info!("starting clock ({}x{})", self.width, self.height);
        Runtime::run(config, self.gpu, shell)
    }
}

impl Default for ClockApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let app = ClockApp::new();
        assert_eq!(app.theme, ThemePreference::Auto);
        assert!(app.style.smooth_seconds);
        assert_eq!((app.width, app.height), (480.0, 480.0));
    }

    #[test]
    fn bad_fonts_are_skipped() {
        let app = ClockApp::new().font(Vec::new()).font(b"nope".to_vec());
        assert!(app.load_fonts().is_empty());
    }
}

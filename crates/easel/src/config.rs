use std::path::PathBuf;
use std::time::Duration;

use easel_engine::logging::LoggingConfig;

/// Window and pacing settings for [`crate::run`] and [`crate::run_with`].
#[derive(Debug, Clone)]
pub struct GraphicsConfig {
    pub title: String,
    /// Initial drawable size in logical pixels.
    pub width: u32,
    pub height: u32,
    /// Minimum time between two `draw()` returns.
    pub min_frame_time: Duration,
    /// Close the window as soon as the drawing callback returns.
    pub close_on_exit: bool,
    pub logging: LoggingConfig,
    /// Font for `text()`. Falls back to a system font when unset.
    pub font: Option<PathBuf>,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            title: "easel".to_string(),
            width: 1000,
            height: 500,
            min_frame_time: Duration::from_millis(16),
            close_on_exit: false,
            logging: LoggingConfig::default(),
            font: None,
        }
    }
}

impl GraphicsConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_min_frame_time(mut self, period: Duration) -> Self {
        self.min_frame_time = period;
        self
    }

    pub fn with_close_on_exit(mut self, close: bool) -> Self {
        self.close_on_exit = close;
        self
    }

    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    pub fn with_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.font = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_window() {
        let c = GraphicsConfig::default();
        assert_eq!((c.width, c.height), (1000, 500));
        assert!(!c.close_on_exit);
        assert!(c.font.is_none());
    }

    #[test]
    fn builder_overrides() {
        let c = GraphicsConfig::new("bounce")
            .with_size(320, 240)
            .with_min_frame_time(Duration::ZERO)
            .with_close_on_exit(true)
            .with_font("fonts/mono.ttf");
        assert_eq!(c.title, "bounce");
        assert_eq!((c.width, c.height), (320, 240));
        assert_eq!(c.min_frame_time, Duration::ZERO);
        assert!(c.close_on_exit);
        assert_eq!(c.font, Some(PathBuf::from("fonts/mono.ttf")));
    }
}

use std::time::Duration;

use crate::error::ConfigError;
use crate::presentation::{Color, Palette};

/// Configuration for a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// How long a tag stays drawn after the detector reports it done.
    pub hide_after_done_delay: Duration,
    /// How long a finished tag still counts as visible. Must exceed
    /// `hide_after_done_delay`.
    pub visibility_done_delay: Duration,
    /// Colors handed out to new tags in rotation.
    pub palette: Vec<Color>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            hide_after_done_delay: Duration::from_millis(1000),
            visibility_done_delay: Duration::from_millis(2000),
            palette: Palette::default_colors(),
        }
    }
}

impl SessionConfig {
    pub fn with_hide_after_done_delay(mut self, delay: Duration) -> Self {
        self.hide_after_done_delay = delay;
        self
    }

    pub fn with_visibility_done_delay(mut self, delay: Duration) -> Self {
        self.visibility_done_delay = delay;
        self
    }

    pub fn with_palette(mut self, palette: Vec<Color>) -> Self {
        self.palette = palette;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hide_after_done_delay.is_zero() {
            return Err(ConfigError::ZeroDelay {
                field: "hide_after_done_delay",
            });
        }
        if self.visibility_done_delay.is_zero() {
            return Err(ConfigError::ZeroDelay {
                field: "visibility_done_delay",
            });
        }
        if self.visibility_done_delay <= self.hide_after_done_delay {
            return Err(ConfigError::DelayOrdering {
                hide: self.hide_after_done_delay,
                visibility: self.visibility_done_delay,
            });
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(SessionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_visibility_delay_must_exceed_hide_delay() {
        let config = SessionConfig::default()
            .with_hide_after_done_delay(Duration::from_secs(2))
            .with_visibility_done_delay(Duration::from_secs(2));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DelayOrdering { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_delay_and_empty_palette() {
        let config = SessionConfig::default().with_hide_after_done_delay(Duration::ZERO);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroDelay {
                field: "hide_after_done_delay"
            })
        );
        let config = SessionConfig::default().with_palette(vec![]);
        assert_eq!(config.validate(), Err(ConfigError::EmptyPalette));
    }
}

use std::{
  path::Path,
  time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

use crate::animation::{
  Easing,
  Transition,
  presets,
};

pub const DEFAULT_TOOLBAR_HEIGHT: f64 = 44.0;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("bad toolbar config: {0}")]
  BadConfig(#[from] toml::de::Error),
  #[error("failed to read toolbar config: {0}")]
  Io(#[from] std::io::Error),
  #[error("toolbar_height must be a finite, non-negative number (got {0})")]
  InvalidHeight(f64),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Where the vertical lift above the selection is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetMode {
  /// Stored coordinates are raw offsets; the surface lifts the toolbar.
  #[default]
  Render,
  /// The lift is subtracted from the stored top; the surface adds none.
  Store,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionConfig {
  pub duration_ms: u64,
  pub easing:      Easing,
}

impl Default for TransitionConfig {
  fn default() -> Self {
    Self {
      duration_ms: presets::TOOLBAR.duration.as_millis() as u64,
      easing:      presets::TOOLBAR.easing,
    }
  }
}

impl From<TransitionConfig> for Transition {
  fn from(config: TransitionConfig) -> Self {
    Transition {
      duration: Duration::from_millis(config.duration_ms),
      easing:   config.easing,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolbarConfig {
  pub toolbar_height: f64,
  pub offset:         OffsetMode,
  pub transition:     TransitionConfig,
}

impl Default for ToolbarConfig {
  fn default() -> Self {
    Self {
      toolbar_height: DEFAULT_TOOLBAR_HEIGHT,
      offset:         OffsetMode::default(),
      transition:     TransitionConfig::default(),
    }
  }
}

impl ToolbarConfig {
  pub fn from_toml(source: &str) -> Result<Self> {
    let config: ToolbarConfig = toml::from_str(source)?;
    config.validate()
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    log::debug!("loading toolbar config from {}", path.display());
    Self::from_toml(&source)
  }

  fn validate(self) -> Result<Self> {
    if !self.toolbar_height.is_finite() || self.toolbar_height < 0.0 {
      return Err(ConfigError::InvalidHeight(self.toolbar_height));
    }
    Ok(self)
  }

  /// Lift baked into stored coordinates.
  pub fn store_lift(&self) -> f64 {
    match self.offset {
      OffsetMode::Store => self.toolbar_height,
      OffsetMode::Render => 0.0,
    }
  }

  /// Lift applied by the rendering surface.
  pub fn render_lift(&self) -> f64 {
    match self.offset {
      OffsetMode::Render => self.toolbar_height,
      OffsetMode::Store => 0.0,
    }
  }

  pub fn transition(&self) -> Transition {
    self.transition.into()
  }
}

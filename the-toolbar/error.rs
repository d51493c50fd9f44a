use the_toolbar_event::StoreError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum ToolbarError {
  #[error("toolbar is already mounted")]
  AlreadyMounted,
  #[error(transparent)]
  Store(#[from] StoreError),
  #[error(transparent)]
  Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, ToolbarError>;

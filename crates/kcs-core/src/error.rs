//! Error types for `kcs-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown form type: {0:?}")]
  UnknownFormType(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

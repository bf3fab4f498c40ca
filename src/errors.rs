//! engine error
use thiserror::Error as ThisError;
/// A `Result` alias where the `Err` case is `curling::Error`.
pub type Result<T> = std::result::Result<T, Error>;
/// The Errors that may occur when building a `Command`.
#[derive(ThisError, Debug)]
pub enum Error {
  /// The source request has no URI, so there is nothing to point curl at.
  #[error("request uri is missing")]
  MissingUri,
  /// A hard I/O failure while reading the request body.
  ///
  /// Ordinary end-of-stream is not an error and never produces this variant.
  #[error("error reading request body")]
  Body(#[source] std::io::Error),
  /// http::Error
  #[error(transparent)]
  Http(http::Error),
}

impl From<http::Error> for Error {
  fn from(value: http::Error) -> Self {
    Error::Http(value)
  }
}

impl From<http::header::InvalidHeaderName> for Error {
  fn from(value: http::header::InvalidHeaderName) -> Self {
    Error::Http(http::Error::from(value))
  }
}

impl From<http::header::InvalidHeaderValue> for Error {
  fn from(value: http::header::InvalidHeaderValue) -> Self {
    Error::Http(http::Error::from(value))
  }
}

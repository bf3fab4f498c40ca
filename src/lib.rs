#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # curling
//!
//! The `curling` crate converts an in-memory HTTP [`Request`] into an
//! equivalent cURL command string, suitable for logging, debugging, or
//! reproducing requests outside the running process.
//!
//! It never executes anything: the output is a shell-safe string.
//!
//! - Byte-exact shell escaping (single or double quotes)
//! - Short or long option spellings (`-H` vs `--header`)
//! - Single-line or multi-line output (Unix, Windows CMD, PowerShell)
//! - Bounded, non-destructive body capture: the request body stream is
//!   readable again after the command is built
//!
//! ## Converting a request
//!
//! ```rust
//! fn main() -> Result<(), curling::Error> {
//!   let mut request = curling::Request::builder()
//!     .method("POST")
//!     .uri("https://localhost/test")
//!     .body("key=value")
//!     .build()?;
//!   let command = curling::Command::from_request(&mut request)?;
//!   // POST with a body is curl's implicit default, so no -X flag.
//!   assert_eq!(
//!     command.to_string(),
//!     "curl --data-raw 'key=value' 'https://localhost/test'"
//!   );
//!   Ok(())
//! }
//! ```
//!
//! ## Configuring the output
//!
//! Formatting and curl flags are set through [`Command::builder`]. Options
//! apply in call order and the last write wins.
//!
//! ```rust
//! fn main() -> Result<(), curling::Error> {
//!   let mut request = curling::Request::builder()
//!     .uri("https://localhost/test")
//!     .header("X-Key", "value")
//!     .build()?;
//!   let command = curling::Command::builder()
//!     .long_form()
//!     .insecure()
//!     .multi_line()
//!     .from_request(&mut request)?;
//!   assert_eq!(
//!     command.to_string(),
//!     "curl --insecure 'https://localhost/test' \\\n--header 'X-Key: value'"
//!   );
//!   Ok(())
//! }
//! ```
//!
//! ## Large bodies
//!
//! Bodies are captured up to a configurable limit (1KB by default, see
//! [`CommandBuilder::max_body_size`]). A truncated body is marked in the
//! output, and the original stream is restored either way.

mod body;
mod command;
mod errors;
mod model;
mod options;
mod request;

pub use body::Body;
pub use command::{Command, CommandBuilder};
pub use errors::{Error, Result};
pub use http::header;
pub use http::uri;
pub use http::Method;
pub use request::{Request, RequestBuilder};

/// Shortcut method to convert a request with the default configuration.
///
/// Equivalent to [`Command::from_request`].
///
/// # Examples
///
/// ```rust
/// fn main() -> Result<(), curling::Error> {
///   let mut request = curling::Request::builder()
///     .uri("https://localhost/test")
///     .build()?;
///   let command = curling::from_request(&mut request)?;
///   assert_eq!(command.to_string(), "curl 'https://localhost/test'");
///   Ok(())
/// }
/// ```
pub fn from_request(request: &mut Request) -> Result<Command> {
  Command::from_request(request)
}

/// Default line continuation character (Unix-like shells).
pub(crate) const LINE_CONTINUATION_DEFAULT: &str = "\\";
/// Line continuation character for Windows CMD.
pub(crate) const LINE_CONTINUATION_WINDOWS: &str = "^";
/// Line continuation character for PowerShell.
pub(crate) const LINE_CONTINUATION_POWERSHELL: &str = "`";

/// Default maximum body size (in bytes).
pub(crate) const DEFAULT_MAX_BODY_SIZE: usize = 1024;

/// All user-configurable settings for a `Command`.
#[derive(Debug, Clone)]
pub(crate) struct Config {
  pub(crate) style: OutputStyle,
  pub(crate) flags: CurlFlags,
  /// Enables the option -m, --max-time when greater than zero.
  pub(crate) request_timeout: u64,
  /// Maximum number of bytes to read from the request body.
  pub(crate) max_body_size: usize,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      style: OutputStyle::default(),
      flags: CurlFlags::default(),
      request_timeout: 0,
      max_body_size: DEFAULT_MAX_BODY_SIZE,
    }
  }
}

/// Options related to the command's text formatting.
#[derive(Debug, Clone)]
pub(crate) struct OutputStyle {
  pub(crate) use_long_form: bool,
  pub(crate) use_multi_line: bool,
  pub(crate) use_double_quotes: bool,
  pub(crate) line_continuation: &'static str,
}

impl Default for OutputStyle {
  fn default() -> Self {
    OutputStyle {
      use_long_form: false,
      use_multi_line: false,
      use_double_quotes: false,
      line_continuation: LINE_CONTINUATION_DEFAULT,
    }
  }
}

/// Common boolean cURL flags.
#[derive(Debug, Clone, Default)]
pub(crate) struct CurlFlags {
  pub(crate) location: bool,
  pub(crate) compressed: bool,
  pub(crate) insecure: bool,
  pub(crate) silent: bool,
}

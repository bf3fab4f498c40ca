use std::collections::HashSet;
use std::fmt;

use http::{HeaderName, Method};

use crate::model::RequestModel;
use crate::options::{
  Config, OutputStyle, LINE_CONTINUATION_DEFAULT, LINE_CONTINUATION_POWERSHELL,
  LINE_CONTINUATION_WINDOWS,
};
use crate::{Request, Result};

/// A cURL command equivalent to an HTTP request.
///
/// A `Command` is immutable once built and can be rendered repeatedly
/// through its `Display` implementation.
///
/// # Examples
///
/// ```
/// fn main() -> Result<(), curling::Error> {
///   let mut request = curling::Request::builder()
///     .method("PUT")
///     .uri("https://localhost/test")
///     .body("key=value")
///     .build()?;
///   let command = curling::Command::from_request(&mut request)?;
///   assert_eq!(
///     command.to_string(),
///     "curl --data-raw 'key=value' -X 'PUT' 'https://localhost/test'"
///   );
///   Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Command {
  /// The complete lines of the command: the main line first, then one line
  /// per header.
  tokens: Vec<String>,
  cfg: Config,
}

impl Command {
  /// Creates a new builder-style object to configure a `Command`.
  pub fn builder() -> CommandBuilder {
    CommandBuilder::default()
  }

  /// Builds a `Command` from `request` with the default configuration.
  ///
  /// The request body, if any, is read up to the configured limit and then
  /// restored, so reading the body afterwards yields the original bytes.
  ///
  /// # Errors
  ///
  /// Fails if the request has no URI, or if reading the body hits a hard
  /// I/O error. Everything else (absent method, headers, auth, cookies or
  /// body) falls back to default behavior.
  pub fn from_request(request: &mut Request) -> Result<Command> {
    CommandBuilder::default().from_request(request)
  }

  /// Returns the lines of the command: the main line first, then one line
  /// per header.
  pub fn lines(&self) -> &[String] {
    &self.tokens
  }
}

impl fmt::Display for Command {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let separator = if self.cfg.style.use_multi_line {
      format!(" {}\n", self.cfg.style.line_continuation)
    } else {
      String::from(" ")
    };
    f.write_str(self.tokens.join(&separator).trim())
  }
}

/// A builder to configure and produce a [`Command`].
///
/// Settings apply in call order and the last write wins. Conflicting calls
/// are not an error.
///
/// # Examples
///
/// ```
/// fn main() -> Result<(), curling::Error> {
///   let mut request = curling::Request::builder()
///     .uri("https://localhost/test")
///     .build()?;
///   let command = curling::Command::builder()
///     .silent()
///     .long_form()
///     .from_request(&mut request)?;
///   assert_eq!(command.to_string(), "curl --silent 'https://localhost/test'");
///   Ok(())
/// }
/// ```
#[derive(Debug, Default, Clone)]
pub struct CommandBuilder {
  cfg: Config,
}

impl CommandBuilder {
  /// Enables the option -L, --location.
  pub fn follow_redirects(mut self) -> CommandBuilder {
    self.cfg.flags.location = true;
    self
  }

  /// Enables the option --compressed.
  pub fn compressed(mut self) -> CommandBuilder {
    self.cfg.flags.compressed = true;
    self
  }

  /// Enables the option -k, --insecure (skip certificate verification).
  pub fn insecure(mut self) -> CommandBuilder {
    self.cfg.flags.insecure = true;
    self
  }

  /// Enables the option -s, --silent (suppress progress meter).
  pub fn silent(mut self) -> CommandBuilder {
    self.cfg.flags.silent = true;
    self
  }

  /// Enables the long form for cURL options.
  /// Example: --header instead of -H.
  pub fn long_form(mut self) -> CommandBuilder {
    self.cfg.style.use_long_form = true;
    self
  }

  /// Splits the command across multiple lines.
  /// The line continuation character is backslash (\).
  pub fn multi_line(mut self) -> CommandBuilder {
    self.cfg.style.use_multi_line = true;
    self.cfg.style.line_continuation = LINE_CONTINUATION_DEFAULT;
    self
  }

  /// Splits the command across multiple lines.
  /// The line continuation character is caret (^), for Windows CMD.
  pub fn windows_multi_line(mut self) -> CommandBuilder {
    self.cfg.style.use_multi_line = true;
    self.cfg.style.line_continuation = LINE_CONTINUATION_WINDOWS;
    self
  }

  /// Splits the command across multiple lines.
  /// The line continuation character is backtick (`), for PowerShell.
  pub fn power_shell_multi_line(mut self) -> CommandBuilder {
    self.cfg.style.use_multi_line = true;
    self.cfg.style.line_continuation = LINE_CONTINUATION_POWERSHELL;
    self
  }

  /// Enables escaping using double quotes (").
  /// The default is single quotes (').
  pub fn double_quotes(mut self) -> CommandBuilder {
    self.cfg.style.use_double_quotes = true;
    self
  }

  /// Enables the option -m, --max-time. It sets the number of seconds the
  /// request should wait for a response before timing out.
  /// Negative values are silently clamped to zero.
  pub fn request_timeout(mut self, seconds: i64) -> CommandBuilder {
    self.cfg.request_timeout = seconds.max(0) as u64;
    self
  }

  /// Limits the request body size (in bytes) to read. If the body is
  /// truncated, the output string is marked with "... (truncated body)".
  /// A value of 0 falls back to the default limit (1KB).
  pub fn max_body_size(mut self, bytes: usize) -> CommandBuilder {
    self.cfg.max_body_size = if bytes == 0 {
      crate::options::DEFAULT_MAX_BODY_SIZE
    } else {
      bytes
    };
    self
  }

  /// Builds a [`Command`] from `request` with this configuration.
  ///
  /// See [`Command::from_request`] for error conditions and the body
  /// restoration guarantee.
  pub fn from_request(self, request: &mut Request) -> Result<Command> {
    let model = RequestModel::build(request, &self.cfg)?;
    let tokens = construct(&self.cfg, &model);
    Ok(Command {
      tokens,
      cfg: self.cfg,
    })
  }
}

/// Runs all the small autonomous builder stages in a fixed order.
fn construct(cfg: &Config, model: &RequestModel) -> Vec<String> {
  // handled tracks headers already represented by a dedicated flag.
  let mut handled = HashSet::new();

  let mut parts = vec![String::from("curl")];
  build_options(&mut parts, cfg);
  build_auth(&mut parts, cfg, model, &mut handled);
  build_cookies(&mut parts, cfg, model, &mut handled);
  build_data(&mut parts, cfg, model);
  build_method(&mut parts, cfg, model);
  build_url(&mut parts, cfg, model);

  let header_parts = build_headers(cfg, model, &handled);

  assemble_tokens(parts, header_parts)
}

/// Adds basic curl flags (-s, -m, -k, --compressed, -L).
fn build_options(args: &mut Vec<String>, cfg: &Config) {
  if cfg.flags.silent {
    args.push(option_form(&cfg.style, "-s", "--silent").to_owned());
  }
  if cfg.request_timeout > 0 {
    args.push(option_form(&cfg.style, "-m", "--max-time").to_owned());
    args.push(cfg.request_timeout.to_string());
  }
  if cfg.flags.insecure {
    args.push(option_form(&cfg.style, "-k", "--insecure").to_owned());
  }
  if cfg.flags.compressed {
    args.push(String::from("--compressed"));
  }
  if cfg.flags.location {
    args.push(option_form(&cfg.style, "-L", "--location").to_owned());
  }
}

/// Adds the -u/--user flag and marks the Authorization header handled.
fn build_auth(
  args: &mut Vec<String>,
  cfg: &Config,
  model: &RequestModel,
  handled: &mut HashSet<HeaderName>,
) {
  let Some(auth) = &model.auth else { return };

  let auth_str = format!("{}:{}", auth.user, auth.pass);
  args.push(option_form(&cfg.style, "-u", "--user").to_owned());
  args.push(escape(&cfg.style, &auth_str));
  handled.insert(http::header::AUTHORIZATION);
}

/// Adds the -b/--cookie flag and marks the Cookie header handled.
fn build_cookies(
  args: &mut Vec<String>,
  cfg: &Config,
  model: &RequestModel,
  handled: &mut HashSet<HeaderName>,
) {
  let Some(cookies) = &model.cookies else { return };

  args.push(option_form(&cfg.style, "-b", "--cookie").to_owned());
  args.push(escape(&cfg.style, cookies));
  handled.insert(http::header::COOKIE);
}

/// Adds the --data-raw flag if data exists.
fn build_data(args: &mut Vec<String>, cfg: &Config, model: &RequestModel) {
  // The flag is added whenever a body was present, even an empty one.
  let Some(data) = &model.data else { return };

  let mut body = String::from_utf8_lossy(&data.bytes).into_owned();

  if data.truncated {
    if model.content_length > 0 {
      body.push_str(&format!(
        "... (truncated body, total {} bytes)",
        model.content_length
      ));
    } else {
      body.push_str("... (truncated body)");
    }
  }

  args.push(String::from("--data-raw"));
  args.push(escape(&cfg.style, &body));
}

/// Adds the -X flag if the method is not a cURL default.
fn build_method(args: &mut Vec<String>, cfg: &Config, model: &RequestModel) {
  let method = match &model.method {
    Some(method) => method.clone(),
    None => {
      if model.data.is_some() {
        Method::POST
      } else {
        Method::GET
      }
    }
  };

  let is_get_default = method == Method::GET && model.data.is_none();
  let is_post_default = method == Method::POST && model.data.is_some();

  if !is_get_default && !is_post_default {
    args.push(option_form(&cfg.style, "-X", "--request").to_owned());
    args.push(escape(&cfg.style, method.as_str()));
  }
}

/// Escapes and adds the URL to the end of the main args.
fn build_url(args: &mut Vec<String>, cfg: &Config, model: &RequestModel) {
  args.push(escape(&cfg.style, &model.uri.to_string()));
}

/// Builds all non-handled HTTP headers, one line-token per header.
fn build_headers(cfg: &Config, model: &RequestModel, handled: &HashSet<HeaderName>) -> Vec<String> {
  if model.headers.is_empty() && model.host.is_empty() {
    return Vec::new();
  }

  let mut host = model.host.clone();
  let mut headers = Vec::new();

  for key in model.headers.keys() {
    if handled.contains(key) {
      continue;
    }

    let values = model
      .headers
      .get_all(key)
      .iter()
      .map(|v| v.to_str().unwrap_or_default())
      .collect::<Vec<_>>()
      .join(", ");

    if key == &http::header::HOST {
      // The host override always wins over the Host header.
      if host.is_empty() {
        host = values;
      }
      continue;
    }
    headers.push(format!("{}: {}", canonical_key(key), values));
  }

  if !host.is_empty() {
    headers.push(format!("Host: {host}"));
  }

  headers.sort();

  headers
    .iter()
    .map(|header| {
      format!(
        "{} {}",
        option_form(&cfg.style, "-H", "--header"),
        escape(&cfg.style, header)
      )
    })
    .collect()
}

/// Constructs the final token lines: the space-joined main line, then one
/// line per header. Empty main-line parts are skipped.
fn assemble_tokens(main_args: Vec<String>, header_args: Vec<String>) -> Vec<String> {
  let main_cmd = main_args
    .iter()
    .filter(|part| !part.is_empty())
    .map(String::as_str)
    .collect::<Vec<_>>()
    .join(" ");
  let mut tokens = vec![main_cmd];
  tokens.extend(header_args);
  tokens
}

/// Returns the correct option spelling based on style.
fn option_form<'a>(style: &OutputStyle, short: &'a str, long: &'a str) -> &'a str {
  if style.use_long_form {
    long
  } else {
    short
  }
}

/// Escapes a string based on style, so it is safe to place unmodified
/// inside a shell command line.
fn escape(style: &OutputStyle, s: &str) -> String {
  if style.use_double_quotes {
    let v = s.replace('"', "\\\"").replace('`', "\\`").replace('$', "\\$");
    return format!("\"{v}\"");
  }

  format!("'{}'", s.replace('\'', "'\\''"))
}

/// Canonical header capitalization: the first letter and any letter
/// following a hyphen is upper case (e.g. "x-key-1" becomes "X-Key-1").
fn canonical_key(key: &HeaderName) -> String {
  let mut out = String::with_capacity(key.as_str().len());
  let mut upper = true;
  for c in key.as_str().chars() {
    if upper {
      out.push(c.to_ascii_uppercase());
    } else {
      out.push(c);
    }
    upper = c == '-';
  }
  out
}

#[cfg(test)]
mod tests {
  use proptest::prelude::*;

  use super::*;
  use crate::Request;

  fn single_quoted(s: &str) -> String {
    escape(&OutputStyle::default(), s)
  }

  fn double_quoted(s: &str) -> String {
    let style = OutputStyle {
      use_double_quotes: true,
      ..OutputStyle::default()
    };
    escape(&style, s)
  }

  #[test]
  fn escape_single_quotes() {
    assert_eq!(single_quoted(""), "''");
    assert_eq!(single_quoted("'"), "''\\'''");
    assert_eq!(single_quoted("'v'"), "''\\''v'\\'''");
  }

  #[test]
  fn escape_double_quotes() {
    assert_eq!(double_quoted(""), "\"\"");
    assert_eq!(double_quoted("\""), "\"\\\"\"");
    assert_eq!(double_quoted("\"v\""), "\"\\\"v\\\"\"");
    assert_eq!(double_quoted("`id`"), "\"\\`id\\`\"");
    assert_eq!(double_quoted("$HOME"), "\"\\$HOME\"");
  }

  #[test]
  fn option_form_spelling() {
    let short = OutputStyle::default();
    let long = OutputStyle {
      use_long_form: true,
      ..OutputStyle::default()
    };
    assert_eq!(option_form(&short, "-F", "--foo"), "-F");
    assert_eq!(option_form(&long, "-F", "--foo"), "--foo");
  }

  #[test]
  fn canonical_key_capitalization() {
    let key = HeaderName::from_static("x-key-single");
    assert_eq!(canonical_key(&key), "X-Key-Single");
    let key = HeaderName::from_static("host");
    assert_eq!(canonical_key(&key), "Host");
  }

  fn command(tokens: Vec<&str>, cfg: Config) -> Command {
    Command {
      tokens: tokens.into_iter().map(String::from).collect(),
      cfg,
    }
  }

  #[test]
  fn display_joins_tokens() {
    assert_eq!(command(vec![], Config::default()).to_string(), "");
    assert_eq!(command(vec!["a"], Config::default()).to_string(), "a");
    assert_eq!(command(vec!["a", "b"], Config::default()).to_string(), "a b");
    assert_eq!(command(vec!["a", ""], Config::default()).to_string(), "a");
    assert_eq!(command(vec!["", ""], Config::default()).to_string(), "");
  }

  #[test]
  fn display_multi_line() {
    let cfg = Config {
      style: OutputStyle {
        use_multi_line: true,
        ..OutputStyle::default()
      },
      ..Config::default()
    };
    let command = command(
      vec![
        "curl -X 'POST' 'https://localhost/test'",
        "-H 'X-Key-1: 1'",
        "-d 'key=value'",
      ],
      cfg,
    );
    assert_eq!(
      command.to_string(),
      "curl -X 'POST' 'https://localhost/test' \\\n-H 'X-Key-1: 1' \\\n-d 'key=value'"
    );
  }

  /// Reverses the single-quote shell convention: quoted runs are literal,
  /// a backslash outside quotes escapes the next character.
  fn unquote_single(s: &str) -> String {
    let mut out = String::new();
    let mut chars = s.chars();
    let mut in_quote = false;
    while let Some(c) = chars.next() {
      if in_quote {
        if c == '\'' {
          in_quote = false;
        } else {
          out.push(c);
        }
      } else {
        match c {
          '\'' => in_quote = true,
          '\\' => {
            if let Some(next) = chars.next() {
              out.push(next);
            }
          }
          other => out.push(other),
        }
      }
    }
    out
  }

  /// Reverses the double-quote shell convention: a backslash escapes
  /// `"`, `` ` `` and `$`, everything else is literal.
  fn unquote_double(s: &str) -> String {
    let inner = s.strip_prefix('"').unwrap().strip_suffix('"').unwrap();
    let mut out = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
      if c == '\\' {
        match chars.next() {
          Some(next @ ('"' | '`' | '$')) => out.push(next),
          Some(next) => {
            out.push(c);
            out.push(next);
          }
          None => out.push(c),
        }
      } else {
        out.push(c);
      }
    }
    out
  }

  proptest! {
    #[test]
    fn escape_single_quote_round_trip(s in any::<String>()) {
      prop_assert_eq!(unquote_single(&single_quoted(&s)), s);
    }

    #[test]
    fn escape_double_quote_round_trip(s in "[ -~]*".prop_map(|s| s.replace('\\', ""))) {
      prop_assert_eq!(unquote_double(&double_quoted(&s)), s);
    }

    #[test]
    fn from_request_never_panics(
      method in "[A-Z]{1,7}",
      uri in prop::sample::select(vec![
        "https://example.com",
        "https://foo.com/q?a='b'",
        "https://localhost/%22",
      ]),
      body in any::<Vec<u8>>(),
      key in "[A-Za-z][A-Za-z-]{0,9}",
      value in "[ -~]{0,16}",
    ) {
      let request = Request::builder()
        .method(method.as_str())
        .uri(uri)
        .header(key.as_str(), value.as_str())
        .body(body)
        .build();
      if let Ok(mut request) = request {
        let _ = Command::from_request(&mut request);
      }
    }
  }
}

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use http::{header, HeaderMap, Method, Uri};

use crate::body::CapturedBody;
use crate::options::Config;
use crate::{Error, Request, Result};

/// Basic authentication credentials parsed from the `Authorization` header.
#[derive(Debug)]
pub(crate) struct BasicAuth {
  pub(crate) user: String,
  pub(crate) pass: String,
}

/// Pre-processed request data used by the builder stages.
///
/// The model is built once per command and owns a snapshot of everything the
/// stages consult, so the generated `Command` stays valid after the source
/// request is gone.
#[derive(Debug)]
pub(crate) struct RequestModel {
  pub(crate) method: Option<Method>,
  pub(crate) uri: Uri,
  pub(crate) headers: HeaderMap,
  pub(crate) host: String,
  pub(crate) auth: Option<BasicAuth>,
  /// Captured body prefix. `None` when the request had no body stream at
  /// all; present (possibly zero bytes) whenever one was attached.
  pub(crate) data: Option<CapturedBody>,
  /// Formatted string of all cookies (e.g., "k1=v1; k2=v2").
  pub(crate) cookies: Option<String>,
  /// The declared content length. Zero or negative means unknown.
  pub(crate) content_length: i64,
}

impl RequestModel {
  /// Pre-processes the request into the internal model.
  ///
  /// The body stream is peeked non-destructively and restored, so it can be
  /// read again by subsequent consumers. Only a missing URI or a hard I/O
  /// failure while reading the body is an error; absent auth, cookies or
  /// body are not.
  pub(crate) fn build(request: &mut Request, cfg: &Config) -> Result<RequestModel> {
    let uri = request.uri().cloned().ok_or(Error::MissingUri)?;
    let auth = basic_auth(request.headers());
    let cookies = join_cookies(request.headers());
    let data = match request.body_mut() {
      Some(body) => body.peek(cfg.max_body_size).map_err(Error::Body)?,
      None => None,
    };
    Ok(RequestModel {
      method: request.method().cloned(),
      uri,
      headers: request.headers().clone(),
      host: request.host().to_owned(),
      auth,
      data,
      cookies,
      content_length: request.content_length(),
    })
  }
}

/// Extracts Basic credentials from the `Authorization` header.
///
/// The `Basic` prefix is matched case-insensitively. Any parse failure means
/// no credentials, never an error.
fn basic_auth(headers: &HeaderMap) -> Option<BasicAuth> {
  let value = headers.get(header::AUTHORIZATION)?.as_bytes();
  let prefix = b"Basic ";
  if value.len() < prefix.len() || !value[..prefix.len()].eq_ignore_ascii_case(prefix) {
    return None;
  }
  let decoded = BASE64_STANDARD.decode(&value[prefix.len()..]).ok()?;
  let decoded = String::from_utf8(decoded).ok()?;
  let (user, pass) = decoded.split_once(':')?;
  Some(BasicAuth {
    user: user.to_owned(),
    pass: pass.to_owned(),
  })
}

/// Joins all cookies attached to the request as "name=value" pairs
/// separated by "; ", preserving their original order.
fn join_cookies(headers: &HeaderMap) -> Option<String> {
  let mut parts = Vec::new();
  for value in headers.get_all(header::COOKIE) {
    let Ok(raw) = value.to_str() else { continue };
    for cookie in cookie::Cookie::split_parse(raw).flatten() {
      parts.push(format!("{}={}", cookie.name(), cookie.value()));
    }
  }
  if parts.is_empty() {
    None
  } else {
    Some(parts.join("; "))
  }
}

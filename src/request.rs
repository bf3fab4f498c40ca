use std::fmt::{Debug, Formatter};

use http::Request as HttpRequest;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};

use crate::body::Body;

/// An HTTP request to describe as a cURL command.
///
/// A `Request` is a snapshot of everything the command generator needs:
/// method, URI, headers, an optional host override and an optional body
/// stream. It is not executed, only read.
#[derive(Default)]
pub struct Request {
  method: Option<Method>,
  uri: Option<Uri>,
  headers: HeaderMap<HeaderValue>,
  host: String,
  body: Option<Body>,
  content_length: i64,
}

impl Debug for Request {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Request")
      .field("method", &self.method)
      .field("uri", &self.uri)
      .field("headers", &self.headers)
      .field("host", &self.host)
      .field("body", &self.body)
      .finish()
  }
}

impl<T> From<HttpRequest<T>> for Request
where
  T: Into<Body>,
{
  fn from(value: HttpRequest<T>) -> Self {
    let (parts, body) = value.into_parts();
    let content_length = parts
      .headers
      .get(http::header::CONTENT_LENGTH)
      .and_then(|v| v.to_str().ok())
      .and_then(|v| v.parse::<i64>().ok())
      .unwrap_or(-1);
    Self {
      method: Some(parts.method),
      uri: Some(parts.uri),
      headers: parts.headers,
      host: String::new(),
      body: Some(body.into()),
      content_length,
    }
  }
}

impl Request {
  /// Creates a new builder-style object to manufacture a `Request`.
  ///
  /// # Examples
  ///
  /// ```
  /// let request = curling::Request::builder()
  ///     .method("GET")
  ///     .uri("https://www.rust-lang.org/")
  ///     .header("X-Custom-Foo", "Bar")
  ///     .build()
  ///     .unwrap();
  /// ```
  pub fn builder() -> RequestBuilder {
    RequestBuilder::default()
  }

  /// Returns the declared HTTP method, if any.
  ///
  /// An undeclared method is treated as `GET` (no body) or `POST` (with a
  /// body) during command generation.
  #[inline]
  pub fn method(&self) -> Option<&Method> {
    self.method.as_ref()
  }

  /// Returns the URI for this request, if any.
  ///
  /// A request without a URI cannot be turned into a command.
  #[inline]
  pub fn uri(&self) -> Option<&Uri> {
    self.uri.as_ref()
  }

  /// Returns the headers of this request.
  #[inline]
  pub fn headers(&self) -> &HeaderMap {
    &self.headers
  }

  /// Returns a mutable reference to the headers of this request.
  #[inline]
  pub fn headers_mut(&mut self) -> &mut HeaderMap {
    &mut self.headers
  }

  /// Returns the host override.
  ///
  /// When non-empty it wins over any `Host` header in the generated command.
  #[inline]
  pub fn host(&self) -> &str {
    &self.host
  }

  /// Returns the request body, if any.
  #[inline]
  pub fn body(&self) -> Option<&Body> {
    self.body.as_ref()
  }

  /// Returns a mutable reference to the request body, if any.
  ///
  /// After a command has been built from this request, reading the body
  /// through this handle still yields the original byte sequence.
  #[inline]
  pub fn body_mut(&mut self) -> Option<&mut Body> {
    self.body.as_mut()
  }

  /// Returns the declared content length. Negative means unknown.
  #[inline]
  pub fn content_length(&self) -> i64 {
    self.content_length
  }
}

/// A builder to construct the properties of a `Request`.
#[derive(Debug, Default)]
pub struct RequestBuilder {
  request: Request,
  err: Option<http::Error>,
}

impl RequestBuilder {
  /// Set the HTTP method for this request.
  pub fn method<M>(mut self, method: M) -> RequestBuilder
  where
    Method: TryFrom<M>,
    <Method as TryFrom<M>>::Error: Into<http::Error>,
  {
    match Method::try_from(method) {
      Ok(method) => self.request.method = Some(method),
      Err(err) => {
        if self.err.is_none() {
          self.err = Some(err.into());
        }
      }
    }
    self
  }

  /// Set the URI for this request.
  pub fn uri<U>(mut self, uri: U) -> RequestBuilder
  where
    Uri: TryFrom<U>,
    <Uri as TryFrom<U>>::Error: Into<http::Error>,
  {
    match Uri::try_from(uri) {
      Ok(uri) => self.request.uri = Some(uri),
      Err(err) => {
        if self.err.is_none() {
          self.err = Some(err.into());
        }
      }
    }
    self
  }

  /// Appends a header to this request.
  pub fn header<K, V>(mut self, key: K, value: V) -> RequestBuilder
  where
    HeaderName: TryFrom<K>,
    HeaderValue: TryFrom<V>,
    <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
    <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
  {
    match (HeaderName::try_from(key), HeaderValue::try_from(value)) {
      (Ok(key), Ok(value)) => {
        self.request.headers.append(key, value);
      }
      (Err(err), _) => {
        if self.err.is_none() {
          self.err = Some(err.into());
        }
      }
      (_, Err(err)) => {
        if self.err.is_none() {
          self.err = Some(err.into());
        }
      }
    }
    self
  }

  /// Add a set of Headers to the existing ones on this Request.
  ///
  /// The headers will be merged in to any already set.
  pub fn headers(mut self, headers: HeaderMap) -> RequestBuilder {
    for (key, value) in headers {
      if let Some(key) = key {
        self.request.headers.insert(key, value);
      }
    }
    self
  }

  /// Set the host override for this request.
  pub fn host<H: Into<String>>(mut self, host: H) -> RequestBuilder {
    self.request.host = host.into();
    self
  }

  /// Set the declared content length. Negative means unknown.
  pub fn content_length(mut self, content_length: i64) -> RequestBuilder {
    self.request.content_length = content_length;
    self
  }

  /// Set the request body.
  pub fn body<T: Into<Body>>(mut self, body: T) -> RequestBuilder {
    self.request.body = Some(body.into());
    self
  }

  /// Build a `Request`, which can be inspected and turned into a `Command`.
  pub fn build(self) -> crate::Result<Request> {
    if let Some(err) = self.err {
      return Err(err.into());
    }
    Ok(self.request)
  }
}

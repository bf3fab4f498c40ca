use std::fmt;
use std::io::{self, Cursor, Read};

use bytes::Bytes;

/// A request body.
///
/// A `Body` is either a readable byte stream, or the explicit no-body
/// sentinel returned by [`Body::empty`]. The distinction matters for command
/// generation: a zero-length stream still produces a `--data-raw ''`
/// argument, while the sentinel (like an absent body) produces none.
pub struct Body {
  inner: Inner,
}

enum Inner {
  Empty,
  Reader(Box<dyn Read + Send>),
}

/// The bounded prefix captured from a body stream.
#[derive(Debug)]
pub(crate) struct CapturedBody {
  pub(crate) bytes: Bytes,
  pub(crate) truncated: bool,
}

impl Body {
  /// Returns the explicit no-body sentinel.
  ///
  /// # Examples
  ///
  /// ```
  /// let body = curling::Body::empty();
  /// assert!(body.is_empty());
  /// ```
  pub fn empty() -> Body {
    Body { inner: Inner::Empty }
  }

  /// Wraps an arbitrary byte stream.
  ///
  /// The total length of the stream does not need to be known in advance.
  ///
  /// # Examples
  ///
  /// ```
  /// let body = curling::Body::from_reader(std::io::Cursor::new(b"key=value".to_vec()));
  /// assert!(!body.is_empty());
  /// ```
  pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Body {
    Body {
      inner: Inner::Reader(Box::new(reader)),
    }
  }

  /// Returns true if this body is the explicit no-body sentinel.
  #[inline]
  pub fn is_empty(&self) -> bool {
    matches!(self.inner, Inner::Empty)
  }

  /// Reads up to `limit` bytes from the stream without consuming it.
  ///
  /// One extra byte is read to detect truncation. Afterwards the body yields
  /// the byte-exact original sequence to any subsequent reader: the peeked
  /// bytes are replayed from an owned buffer chained to the unread remainder
  /// of the stream. A hard I/O failure propagates; end-of-stream before the
  /// limit does not.
  pub(crate) fn peek(&mut self, limit: usize) -> io::Result<Option<CapturedBody>> {
    let reader = match std::mem::replace(&mut self.inner, Inner::Empty) {
      Inner::Empty => return Ok(None),
      Inner::Reader(reader) => reader,
    };
    let mut take = reader.take(limit as u64 + 1);
    let mut peeked = Vec::new();
    take.read_to_end(&mut peeked)?;
    let truncated = peeked.len() > limit;
    let peeked = Bytes::from(peeked);
    let bytes = peeked.slice(..limit.min(peeked.len()));
    // Restore the full stream for subsequent readers.
    let rest = take.into_inner();
    self.inner = Inner::Reader(Box::new(Cursor::new(peeked).chain(rest)));
    Ok(Some(CapturedBody { bytes, truncated }))
  }
}

impl Default for Body {
  fn default() -> Self {
    Body::empty()
  }
}

impl Read for Body {
  fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
    match &mut self.inner {
      Inner::Empty => Ok(0),
      Inner::Reader(reader) => reader.read(buf),
    }
  }
}

impl From<Bytes> for Body {
  #[inline]
  fn from(b: Bytes) -> Body {
    Body {
      inner: Inner::Reader(Box::new(Cursor::new(b))),
    }
  }
}

impl From<String> for Body {
  #[inline]
  fn from(s: String) -> Body {
    s.into_bytes().into()
  }
}

impl From<&'static str> for Body {
  #[inline]
  fn from(s: &'static str) -> Body {
    s.as_bytes().into()
  }
}

impl From<&'static [u8]> for Body {
  #[inline]
  fn from(s: &'static [u8]) -> Body {
    Bytes::from_static(s).into()
  }
}

impl From<Vec<u8>> for Body {
  #[inline]
  fn from(v: Vec<u8>) -> Body {
    Bytes::from(v).into()
  }
}

impl From<()> for Body {
  #[inline]
  fn from(_: ()) -> Body {
    Body::empty()
  }
}

impl From<Option<Vec<u8>>> for Body {
  #[inline]
  fn from(v: Option<Vec<u8>>) -> Body {
    match v {
      Some(vv) => vv.into(),
      None => Body::empty(),
    }
  }
}

impl fmt::Debug for Body {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self.inner {
      Inner::Empty => f.write_str("Body::empty"),
      Inner::Reader(_) => f.write_str("Body"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct BrokenReader;

  impl Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
      Err(io::Error::other("error reading data"))
    }
  }

  fn read_all(body: &mut Body) -> Vec<u8> {
    let mut restored = Vec::new();
    body.read_to_end(&mut restored).unwrap();
    restored
  }

  #[test]
  fn peek_sentinel() {
    let mut body = Body::empty();
    assert!(body.peek(10).unwrap().is_none());
    assert!(body.is_empty());
  }

  #[test]
  fn peek_under_limit() {
    let mut body = Body::from("12345");
    let captured = body.peek(10).unwrap().unwrap();
    assert_eq!(captured.bytes.as_ref(), b"12345");
    assert!(!captured.truncated);
    assert_eq!(read_all(&mut body), b"12345");
  }

  #[test]
  fn peek_at_limit() {
    let mut body = Body::from("1234567890");
    let captured = body.peek(10).unwrap().unwrap();
    assert_eq!(captured.bytes.as_ref(), b"1234567890");
    assert!(!captured.truncated);
    assert_eq!(read_all(&mut body), b"1234567890");
  }

  #[test]
  fn peek_over_limit() {
    let mut body = Body::from("12345678901234");
    let captured = body.peek(10).unwrap().unwrap();
    assert_eq!(captured.bytes.as_ref(), b"1234567890");
    assert!(captured.truncated);
    assert_eq!(read_all(&mut body), b"12345678901234");
  }

  #[test]
  fn peek_zero_length_stream() {
    let mut body = Body::from(Vec::new());
    let captured = body.peek(10).unwrap().unwrap();
    assert!(captured.bytes.is_empty());
    assert!(!captured.truncated);
    assert_eq!(read_all(&mut body), b"");
  }

  #[test]
  fn peek_unknown_length_stream() {
    // A chained reader has no known total length up front.
    let stream = Cursor::new(b"abcdefg".to_vec()).chain(Cursor::new(b"hijklmn".to_vec()));
    let mut body = Body::from_reader(stream);
    let captured = body.peek(10).unwrap().unwrap();
    assert_eq!(captured.bytes.as_ref(), b"abcdefghij");
    assert!(captured.truncated);
    assert_eq!(read_all(&mut body), b"abcdefghijklmn");
  }

  #[test]
  fn peek_hard_error() {
    let mut body = Body::from_reader(BrokenReader);
    assert!(body.peek(10).is_err());
  }

  #[test]
  fn peek_error_past_prefix() {
    let stream = Cursor::new(b"abc".to_vec()).chain(BrokenReader);
    let mut body = Body::from_reader(stream);
    assert!(body.peek(10).is_err());
  }
}

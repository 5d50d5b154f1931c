//! Streaming decode of a JSON array of records.
//!
//! A day file is a single JSON array that can grow large; scans must not
//! buffer it whole. [`ArrayReader`] walks the array one element at a time:
//! it consumes the opening bracket, then alternates between framing bytes
//! (commas, the closing bracket) and handing the reader to a
//! `serde_json::Deserializer` for exactly one element.
//!
//! Elements must be self-delimiting JSON values (objects, arrays, strings).
//! A bare scalar would make the deserializer read one byte past the value
//! to find its end, and that byte cannot be handed back to the framing
//! loop. Day files only ever hold objects.

use std::io::BufRead;
use std::marker::PhantomData;

use serde::de::{DeserializeOwned, Error as _};

/// Iterator over the elements of a JSON array read from `reader`.
///
/// Yields `Err` once and then terminates if the stream is not a
/// well-formed array; I/O failures surface as `serde_json` errors with
/// category `Io`.
#[derive(Debug)]
pub(crate) struct ArrayReader<R, T> {
    reader: R,
    started: bool,
    finished: bool,
    first: bool,
    element: PhantomData<T>,
}

impl<R: BufRead, T: DeserializeOwned> ArrayReader<R, T> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            started: false,
            finished: false,
            first: true,
            element: PhantomData,
        }
    }

    /// Peek the next non-whitespace byte without consuming it.
    fn peek_non_ws(&mut self) -> std::io::Result<Option<u8>> {
        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(None);
            }
            match buf.iter().position(|b| !b.is_ascii_whitespace()) {
                Some(skip) => {
                    self.reader.consume(skip);
                    let buf = self.reader.fill_buf()?;
                    return Ok(Some(buf[0]));
                }
                None => {
                    let len = buf.len();
                    self.reader.consume(len);
                }
            }
        }
    }

    fn framing(&mut self) -> serde_json::Result<Option<u8>> {
        self.peek_non_ws().map_err(serde_json::Error::io)
    }

    fn fail(&mut self, err: serde_json::Error) -> Option<serde_json::Result<T>> {
        self.finished = true;
        Some(Err(err))
    }

    fn next_element(&mut self) -> Option<serde_json::Result<T>> {
        if self.finished {
            return None;
        }

        if !self.started {
            match self.framing() {
                Ok(Some(b'[')) => {
                    self.reader.consume(1);
                    self.started = true;
                }
                Ok(_) => return self.fail(serde_json::Error::custom("expected a JSON array")),
                Err(err) => return self.fail(err),
            }
        }

        match self.framing() {
            Ok(Some(b']')) => {
                self.reader.consume(1);
                self.finished = true;
                return None;
            }
            Ok(Some(b',')) if !self.first => self.reader.consume(1),
            Ok(Some(_)) if self.first => {}
            Ok(Some(_)) => {
                return self.fail(serde_json::Error::custom("expected `,` or `]` in array"));
            }
            Ok(None) => {
                return self.fail(serde_json::Error::custom(
                    "unexpected end of file inside array",
                ));
            }
            Err(err) => return self.fail(err),
        }

        let mut de = serde_json::Deserializer::from_reader(&mut self.reader);
        match T::deserialize(&mut de) {
            Ok(element) => {
                self.first = false;
                Some(Ok(element))
            }
            Err(err) => self.fail(err),
        }
    }
}

impl<R: BufRead, T: DeserializeOwned> Iterator for ArrayReader<R, T> {
    type Item = serde_json::Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_element()
    }
}

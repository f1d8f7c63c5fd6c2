// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::{Error, Result};
use bytes::Bytes;
use std::fmt::{Debug, Formatter};
use std::io::{Cursor, Read};
use std::mem;

/// Body is the body of an outgoing request.
///
/// Signing needs the whole body while the transport needs it afterwards, so reading
/// a body for signing never consumes it: see [`Body::buffer`].
#[derive(Default)]
pub enum Body {
    /// No body at all.
    #[default]
    Empty,
    /// In-memory body.
    Bytes(Bytes),
    /// Streaming body that has not been read yet.
    Reader(Box<dyn Read + Send>),
}

impl Body {
    /// Create a body from a reader.
    pub fn from_reader(reader: impl Read + Send + 'static) -> Self {
        Body::Reader(Box::new(reader))
    }

    /// Returns true if this body is held in memory (or absent).
    pub fn is_buffered(&self) -> bool {
        !matches!(self, Body::Reader(_))
    }

    /// Returns the in-memory content, if any.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Body::Bytes(bs) => Some(bs),
            _ => None,
        }
    }

    /// Read the whole body for signing and keep it available for transmission.
    ///
    /// - `Empty` returns `None`.
    /// - `Bytes` returns a cheap clone and stays untouched.
    /// - `Reader` is drained once and replaced by `Bytes` holding the drained content.
    ///
    /// If draining fails, or the reader panics, the body is put back as a reader that
    /// yields the bytes drained so far followed by the rest of the stream, so no content
    /// is lost on any exit path. The error has kind [`crate::ErrorKind::BodyRead`].
    pub fn buffer(&mut self) -> Result<Option<Bytes>> {
        let reader = match mem::take(self) {
            Body::Empty => return Ok(None),
            Body::Bytes(bs) => {
                *self = Body::Bytes(bs.clone());
                return Ok(Some(bs));
            }
            Body::Reader(reader) => reader,
        };

        DrainGuard {
            slot: self,
            drained: Vec::new(),
            reader: Some(reader),
        }
        .drain()
    }

    /// Convert into bytes for the transport, reading the stream if needed.
    pub fn into_bytes(self) -> Result<Bytes> {
        match self {
            Body::Empty => Ok(Bytes::new()),
            Body::Bytes(bs) => Ok(bs),
            Body::Reader(mut reader) => {
                let mut buf = Vec::new();
                reader
                    .read_to_end(&mut buf)
                    .map_err(|e| Error::body_read("failed to read request body").with_source(e))?;
                Ok(Bytes::from(buf))
            }
        }
    }
}

/// Holds a reader taken out of a [`Body`] and puts it back on drop unless draining succeeded.
struct DrainGuard<'a> {
    slot: &'a mut Body,
    drained: Vec<u8>,
    reader: Option<Box<dyn Read + Send>>,
}

impl DrainGuard<'_> {
    fn drain(mut self) -> Result<Option<Bytes>> {
        let result = match self.reader.as_mut() {
            Some(reader) => reader.read_to_end(&mut self.drained),
            None => Ok(0),
        };

        match result {
            Ok(_) => {
                self.reader = None;
                let bs = Bytes::from(mem::take(&mut self.drained));
                *self.slot = Body::Bytes(bs.clone());
                Ok(Some(bs))
            }
            Err(err) => Err(Error::body_read(format!(
                "failed to read request body after {} bytes",
                self.drained.len()
            ))
            .with_source(err)),
        }
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            let drained = mem::take(&mut self.drained);
            *self.slot = Body::Reader(Box::new(Cursor::new(drained).chain(reader)));
        }
    }
}

impl Debug for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Body::Empty => f.write_str("Empty"),
            Body::Bytes(bs) => f.debug_tuple("Bytes").field(&bs.len()).finish(),
            Body::Reader(_) => f.write_str("Reader"),
        }
    }
}

impl From<()> for Body {
    fn from(_: ()) -> Self {
        Body::Empty
    }
}

impl From<Bytes> for Body {
    fn from(value: Bytes) -> Self {
        Body::Bytes(value)
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(value))
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Body::Bytes(Bytes::from(value))
    }
}

impl From<&'static str> for Body {
    fn from(value: &'static str) -> Self {
        Body::Bytes(Bytes::from_static(value.as_bytes()))
    }
}

impl From<&'static [u8]> for Body {
    fn from(value: &'static [u8]) -> Self {
        Body::Bytes(Bytes::from_static(value))
    }
}

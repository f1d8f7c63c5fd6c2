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

//! The three links of the signature chain.
//!
//! Each link is an HMAC-SHA256 whose key is the raw digest of the previous link:
//!
//! ```text
//! operation_key = HMAC(secret_key,    method || request_uri)   e.g. "GET/api/v2/test/resource"
//! date_key      = HMAC(operation_key, request_date[..13])      e.g. "2020-12-01T23"
//! signature     = HMAC(date_key,      body)                    zero bytes if there is no body
//! ```
//!
//! Signatures computed within the same UTC hour share `date_key`, the hour is the
//! unit of replay tolerance baked into the signature.

use chainsign_core::hash::{hmac_sha256, hmac_sha256_verify};
use chainsign_core::{Error, Result};

use crate::constants::HOUR_WINDOW_LEN;

/// First link: bind the signature to the HTTP method and request URI.
pub fn operation_key(secret_key: &[u8], method: &str, request_uri: &str) -> Vec<u8> {
    let mut operation = String::with_capacity(method.len() + request_uri.len());
    operation.push_str(method);
    operation.push_str(request_uri);

    hmac_sha256(secret_key, operation.as_bytes())
}

/// Second link: bind the signature to the UTC hour of `request_date`.
pub fn date_key(operation_key: &[u8], request_date: &str) -> Result<Vec<u8>> {
    Ok(hmac_sha256(operation_key, hour_window(request_date)?.as_bytes()))
}

/// Third link: bind the signature to the request body.
///
/// An absent body and an empty body both sign zero bytes.
pub fn body_signature(date_key: &[u8], body: Option<&[u8]>) -> Vec<u8> {
    hmac_sha256(date_key, body.unwrap_or_default())
}

/// Return the `YYYY-MM-DDTHH` prefix of an RFC 3339 timestamp.
pub fn hour_window(request_date: &str) -> Result<&str> {
    let window = request_date
        .get(..HOUR_WINDOW_LEN)
        .filter(|w| is_hour_window(w.as_bytes()))
        .ok_or_else(|| {
            Error::request_invalid(format!(
                "request date '{request_date}' does not start with YYYY-MM-DDTHH"
            ))
        })?;

    Ok(window)
}

fn is_hour_window(bs: &[u8]) -> bool {
    bs.iter().enumerate().all(|(idx, b)| match idx {
        4 | 7 => *b == b'-',
        10 => *b == b'T',
        _ => b.is_ascii_digit(),
    })
}

/// SignatureChain walks the three links for a single request.
///
/// It only lives for one signing or verifying computation and is consumed by the
/// final link.
pub struct SignatureChain {
    key: Vec<u8>,
}

impl SignatureChain {
    /// Start a chain keyed with the shared secret.
    pub fn new(secret_key: &[u8]) -> Self {
        Self {
            key: secret_key.to_vec(),
        }
    }

    /// Apply the operation link.
    pub fn operation(self, method: &str, request_uri: &str) -> Self {
        Self {
            key: operation_key(&self.key, method, request_uri),
        }
    }

    /// Apply the date link.
    pub fn date(self, request_date: &str) -> Result<Self> {
        Ok(Self {
            key: date_key(&self.key, request_date)?,
        })
    }

    /// Apply the body link and return the final digest.
    pub fn sign(self, body: Option<&[u8]>) -> Vec<u8> {
        body_signature(&self.key, body)
    }

    /// Apply the body link and compare it against `signature` in constant time.
    pub fn verify(self, body: Option<&[u8]>, signature: &[u8]) -> bool {
        hmac_sha256_verify(&self.key, body.unwrap_or_default(), signature)
    }

    /// Key the next link will use.
    pub fn key(&self) -> &[u8] {
        &self.key
    }
}

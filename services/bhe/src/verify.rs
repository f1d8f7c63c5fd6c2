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

//! Verifier side of the chained HMAC scheme.
//!
//! A service accepting signed requests recomputes the chain from what it received:
//! the received method, URI, body and the received `RequestDate` string (not its own
//! clock) for the date link. Independently, `RequestDate` must lie within
//! `max_skew` of the verifier clock, since the hour window alone does not bound how
//! long a captured signature stays reusable.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use http::header::AUTHORIZATION;
use log::debug;

use chainsign_core::hash::base64_decode;
use chainsign_core::time::{now, parse_rfc3339, DateTime};
use chainsign_core::{Error, Result, SigningCredential};

use crate::constants::*;
use crate::credential::Credential;
use crate::sign_request::request_uri;
use crate::signature::SignatureChain;

/// ResolveCredential maps a key id to the verifier's copy of the shared secret.
pub trait ResolveCredential: Send + Sync {
    /// Returns `None` if the key id is unknown.
    fn resolve(&self, key_id: &str) -> Option<Credential>;
}

impl ResolveCredential for HashMap<String, Credential> {
    fn resolve(&self, key_id: &str) -> Option<Credential> {
        self.get(key_id).cloned()
    }
}

impl ResolveCredential for Credential {
    fn resolve(&self, key_id: &str) -> Option<Credential> {
        (self.key_id == key_id).then(|| self.clone())
    }
}

impl<T: ResolveCredential + ?Sized> ResolveCredential for Arc<T> {
    fn resolve(&self, key_id: &str) -> Option<Credential> {
        self.as_ref().resolve(key_id)
    }
}

/// A request whose signature has been accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedRequest {
    /// Key id the request was signed with.
    pub key_id: String,
    /// Signing time claimed by the request.
    pub request_date: DateTime,
}

/// RequestVerifier checks signed requests.
#[derive(Debug)]
pub struct RequestVerifier<R> {
    resolver: R,
    max_skew: TimeDelta,
    time: Option<DateTime>,
}

impl<R: ResolveCredential> RequestVerifier<R> {
    /// Create a verifier accepting requests dated up to [`DEFAULT_MAX_SKEW`] away.
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            max_skew: to_time_delta(DEFAULT_MAX_SKEW),
            time: None,
        }
    }

    /// Set the accepted distance between `RequestDate` and the verifier clock.
    pub fn with_max_skew(mut self, max_skew: Duration) -> Self {
        self.max_skew = to_time_delta(max_skew);
        self
    }

    /// Specify the verifier clock.
    ///
    /// # Note
    ///
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Verify a received request.
    ///
    /// `body` must be the body exactly as received, `None` if there was none.
    pub fn verify(
        &self,
        parts: &http::request::Parts,
        body: Option<&[u8]>,
    ) -> Result<VerifiedRequest> {
        let key_id = parse_authorization(header(parts, AUTHORIZATION.as_str())?)?;
        let request_date = header(parts, REQUEST_DATE)?;
        let signature = base64_decode(header(parts, SIGNATURE)?)?;

        let cred = self
            .resolver
            .resolve(key_id)
            .ok_or_else(|| Error::credential_denied(format!("unknown key id {key_id}")))?;
        // An empty secret would let anyone knowing the key id forge signatures.
        if !cred.is_valid() {
            debug!("credential resolved for key {key_id} is not usable");
            return Err(Error::credential_denied(format!(
                "no usable credential for key id {key_id}"
            )));
        }

        let signed_at = parse_rfc3339(request_date)?;
        let now = self.time.unwrap_or_else(now);
        let skew = (now - signed_at).abs();
        if skew > self.max_skew {
            debug!("request date {request_date} is {skew} away from {now}");
            return Err(Error::request_expired(format!(
                "request date {request_date} is outside of the accepted skew window"
            )));
        }

        let uri = request_uri(&parts.uri);
        let accepted = SignatureChain::new(&cred.secret_key)
            .operation(parts.method.as_str(), &uri)
            .date(request_date)?
            .verify(body, &signature);
        if !accepted {
            debug!("signature mismatch for {} {} with key {key_id}", parts.method, uri);
            return Err(Error::signature_mismatch(format!(
                "signature does not match for key id {key_id}"
            )));
        }

        Ok(VerifiedRequest {
            key_id: key_id.to_string(),
            request_date: signed_at,
        })
    }
}

fn to_time_delta(d: Duration) -> TimeDelta {
    TimeDelta::from_std(d).unwrap_or(TimeDelta::max_value())
}

fn header<'a>(parts: &'a http::request::Parts, name: &str) -> Result<&'a str> {
    let value = parts
        .headers
        .get(name)
        .ok_or_else(|| Error::request_invalid(format!("missing header {name}")))?;

    Ok(value.to_str()?)
}

/// Parse `bhesignature <key id>`.
fn parse_authorization(value: &str) -> Result<&str> {
    value
        .strip_prefix(SIGNATURE_SCHEME)
        .and_then(|v| v.strip_prefix(' '))
        .filter(|key_id| !key_id.is_empty() && !key_id.contains(' '))
        .ok_or_else(|| {
            Error::request_invalid(format!(
                "authorization is not in the form '{SIGNATURE_SCHEME} <key id>'"
            ))
        })
}

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

//! Request signer for the chained HMAC scheme.

use std::borrow::Cow;

use chrono::Datelike;
use http::header::{HeaderName, AUTHORIZATION, USER_AGENT};
use http::{HeaderMap, HeaderValue, Uri};
use log::debug;

use chainsign_core::hash::base64_encode;
use chainsign_core::time::{format_rfc3339, now, DateTime};
use chainsign_core::{Context, Error, Result, SignRequest};

use crate::constants::*;
use crate::credential::Credential;
use crate::signature::SignatureChain;

/// The part of an outgoing request that gets signed.
#[derive(Debug, Clone)]
pub struct RequestDescriptor<'a> {
    /// HTTP method, e.g. `GET`.
    pub method: &'a str,
    /// Path and query of the request, without scheme and host.
    pub request_uri: Cow<'a, str>,
    /// Request body, `None` if the request has none.
    pub body: Option<&'a [u8]>,
    /// Signing instant.
    pub timestamp: DateTime,
}

impl<'a> RequestDescriptor<'a> {
    /// Create a descriptor without body.
    pub fn new(method: &'a str, request_uri: &'a str, timestamp: DateTime) -> Self {
        Self {
            method,
            request_uri: Cow::Borrowed(request_uri),
            body: None,
            timestamp,
        }
    }

    /// Set the body.
    pub fn with_body(mut self, body: &'a [u8]) -> Self {
        self.body = Some(body);
        self
    }

    /// Build a descriptor from request parts.
    pub fn from_parts(
        parts: &'a http::request::Parts,
        body: Option<&'a [u8]>,
        timestamp: DateTime,
    ) -> Self {
        Self {
            method: parts.method.as_str(),
            request_uri: request_uri(&parts.uri),
            body,
            timestamp,
        }
    }
}

/// Path and query of `uri` exactly as they will be sent.
///
/// A missing path is signed as `/`.
pub fn request_uri(uri: &Uri) -> Cow<'_, str> {
    match uri.path_and_query().map(|paq| paq.as_str()) {
        None | Some("") => Cow::Borrowed("/"),
        Some(paq) if paq.starts_with('?') => Cow::Owned(format!("/{paq}")),
        Some(paq) => Cow::Borrowed(paq),
    }
}

/// Headers produced by signing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// `Authorization`: the scheme literal followed by the key id.
    pub authorization: String,
    /// `RequestDate`: full RFC 3339 signing time.
    pub request_date: String,
    /// `Signature`: base64 of the final digest.
    pub signature: String,
}

impl SignedHeaders {
    /// Insert the signed headers, replacing any existing values.
    ///
    /// Nothing is inserted if any value is not a valid header value.
    pub fn apply(self, headers: &mut HeaderMap) -> Result<()> {
        let mut authorization = HeaderValue::from_str(&self.authorization)?;
        authorization.set_sensitive(true);
        let request_date = HeaderValue::from_str(&self.request_date)?;
        let mut signature = HeaderValue::from_str(&self.signature)?;
        signature.set_sensitive(true);

        headers.insert(AUTHORIZATION, authorization);
        headers.insert(HeaderName::from_static(REQUEST_DATE), request_date);
        headers.insert(HeaderName::from_static(SIGNATURE), signature);
        Ok(())
    }
}

/// Sign `req` with `credential`.
///
/// The result only depends on the inputs: the same credential and descriptor always
/// give the same headers.
pub fn sign(credential: &Credential, req: &RequestDescriptor<'_>) -> Result<SignedHeaders> {
    if credential.secret_key.is_empty() {
        return Err(Error::credential_invalid("secret key must not be empty"));
    }
    if !credential.has_valid_key_id() {
        return Err(Error::credential_invalid(
            "key id must be non-empty visible ascii",
        ));
    }
    if req.method.is_empty() || req.request_uri.is_empty() {
        return Err(Error::request_invalid(
            "method and request uri must not be empty",
        ));
    }

    let request_date = format_request_date(req.timestamp)?;
    debug!(
        "signing {} {} for key {} at {}",
        req.method, req.request_uri, credential.key_id, request_date
    );

    let signature = SignatureChain::new(&credential.secret_key)
        .operation(req.method, &req.request_uri)
        .date(&request_date)?
        .sign(req.body);

    Ok(SignedHeaders {
        authorization: format!("{SIGNATURE_SCHEME} {}", credential.key_id),
        request_date,
        signature: base64_encode(&signature),
    })
}

/// The hour window is the first 13 characters, so only four digit years can be signed.
fn format_request_date(t: DateTime) -> Result<String> {
    if !(0..=9999).contains(&t.year()) {
        return Err(Error::clock_unavailable(format!(
            "signing time {t} is outside of the supported years 0000-9999"
        )));
    }

    Ok(format_rfc3339(t))
}

/// RequestSigner that implements the chained HMAC signature.
///
/// It sets `Authorization`, `RequestDate`, `Signature` and `User-Agent` on the request.
#[derive(Debug)]
pub struct RequestSigner {
    time: Option<DateTime>,
    user_agent: String,
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self {
            time: None,
            user_agent: format!("chainsign-bhe/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Override the `User-Agent` sent with signed requests.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[async_trait::async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _ctx: &Context,
        parts: &mut http::request::Parts,
        body: Option<&[u8]>,
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let cred = credential.ok_or_else(|| Error::credential_invalid("missing credential"))?;
        // One clock sample feeds both the hour window and the RequestDate header.
        let now = self.time.unwrap_or_else(now);

        let signed = sign(cred, &RequestDescriptor::from_parts(parts, body, now))?;
        let user_agent = HeaderValue::from_str(&self.user_agent)?;

        signed.apply(&mut parts.headers)?;
        parts.headers.insert(USER_AGENT, user_agent);
        Ok(())
    }
}

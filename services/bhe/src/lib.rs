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

//! Signer and verifier for the `bhesignature` HTTP authentication scheme.
//!
//! Every request carries a signature produced by a chain of three HMAC-SHA256
//! computations:
//!
//! 1. The token key signs the method and request URI.
//! 2. The result signs the hour window of the `RequestDate` header.
//! 3. The result signs the request body.
//!
//! The final digest is sent base64 encoded in the `Signature` header, next to
//! `Authorization: bhesignature <token id>` and the full `RequestDate`.
//!
//! ## Example
//!
//! ```no_run
//! use chainsign_bhe::{DefaultCredentialProvider, RequestSigner};
//! use chainsign_core::{Body, Context, OsEnv, Result, Signer};
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let signer = Signer::new(ctx, DefaultCredentialProvider::new(), RequestSigner::new());
//!
//! let req = http::Request::post("https://bhe.example.com/api/v2/file-upload/42")
//!     .body(Body::from(r#"{"name":"test"}"#))?;
//! let req = signer.sign_http(req).await?;
//! assert!(req.headers().contains_key("signature"));
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

pub mod signature;
pub use signature::SignatureChain;

mod sign_request;
pub use sign_request::{request_uri, sign, RequestDescriptor, RequestSigner, SignedHeaders};

mod verify;
pub use verify::{RequestVerifier, ResolveCredential, VerifiedRequest};

mod provide_credential;
pub use provide_credential::*;

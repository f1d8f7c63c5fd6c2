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

//! Signing API requests with chained HMAC-SHA256 signatures.
//!
//! `chainsign` re-exports [`chainsign_core`] and gates every service behind a feature.
//!
//! ## Example
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> chainsign::Result<()> {
//! use chainsign::Body;
//!
//! let signer = chainsign::bhe::default_signer();
//!
//! let req = http::Request::get("https://bhe.example.com/api/v2/test/resource")
//!     .body(Body::Empty)?;
//! let req = signer.sign_http(req).await?;
//! println!("signed: {:?}", req.headers());
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `bhe`: the `bhesignature` scheme, see [`bhe`].
//! - `default-context`: [`default_context`], reading files with tokio and env from the OS.

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub use chainsign_core::*;

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::default_context;

#[cfg(feature = "bhe")]
pub mod bhe;

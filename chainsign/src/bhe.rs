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

//! `bhesignature` support with convenience APIs.

pub use chainsign_bhe::*;

#[cfg(feature = "default-context")]
use crate::{default_context, Signer};

/// Signer for the `bhesignature` scheme.
#[cfg(feature = "default-context")]
pub type DefaultSigner = Signer<Credential>;

/// Create a signer with the standard configuration.
///
/// This function creates a signer with:
/// - Default context (tokio file reader, OS environment)
/// - Default credential provider (`BHE_TOKEN_ID`/`BHE_TOKEN_KEY`, then `~/.bhe/credentials`)
/// - Request signer sending the current time
///
/// # Example
///
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> chainsign::Result<()> {
/// let signer = chainsign::bhe::default_signer();
///
/// let (mut parts, _) = http::Request::get("https://bhe.example.com/api/version")
///     .body(())?
///     .into_parts();
/// signer.sign(&mut parts, &mut chainsign::Body::Empty).await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub fn default_signer() -> DefaultSigner {
    Signer::new(
        default_context(),
        DefaultCredentialProvider::new(),
        RequestSigner::new(),
    )
}

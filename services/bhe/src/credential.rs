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

use std::fmt::{Debug, Formatter};

use chainsign_core::{utils::Redact, SigningCredential};

/// Credential for the chained HMAC scheme: a shared secret and the id the server knows it by.
///
/// The secret is only ever borrowed by the signer; `Debug` output redacts it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Public id of the key, sent in clear in `Authorization`.
    pub key_id: String,
    /// Shared secret used as the key of the first link.
    pub secret_key: Vec<u8>,
}

impl Credential {
    /// Create a new credential.
    pub fn new(key_id: impl Into<String>, secret_key: impl Into<Vec<u8>>) -> Self {
        Self {
            key_id: key_id.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Key id is sent in `Authorization`, so it must be non-empty visible ascii.
    pub(crate) fn has_valid_key_id(&self) -> bool {
        !self.key_id.is_empty() && self.key_id.bytes().all(|b| b.is_ascii_graphic())
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("key_id", &self.key_id)
            .field("secret_key", &Redact::from(&self.secret_key))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        self.has_valid_key_id() && !self.secret_key.is_empty()
    }
}

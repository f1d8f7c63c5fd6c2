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

//! Constants for the chained HMAC signature scheme.

use std::time::Duration;

// Env values used to configure credentials.
/// Env of the token id (the key id sent in `Authorization`).
pub const BHE_TOKEN_ID: &str = "BHE_TOKEN_ID";
/// Env of the token key (the shared secret).
pub const BHE_TOKEN_KEY: &str = "BHE_TOKEN_KEY";
/// Env overriding the credential file path.
pub const BHE_CONFIG_FILE: &str = "BHE_CONFIG_FILE";
/// Env overriding the profile read from the credential file.
pub const BHE_PROFILE: &str = "BHE_PROFILE";

/// Credential file read when [`BHE_CONFIG_FILE`] is not set.
pub const BHE_DEFAULT_CONFIG_FILE: &str = "~/.bhe/credentials";
/// Profile read when [`BHE_PROFILE`] is not set.
pub const BHE_DEFAULT_PROFILE: &str = "default";

/// Scheme literal leading the `Authorization` header value.
pub const SIGNATURE_SCHEME: &str = "bhesignature";

// Headers used by the signature scheme.
/// `RequestDate` header carrying the full RFC 3339 signing time.
pub const REQUEST_DATE: &str = "requestdate";
/// `Signature` header carrying the base64 encoded final digest.
pub const SIGNATURE: &str = "signature";

/// Length of the `YYYY-MM-DDTHH` prefix of the request date signed by the date link.
pub const HOUR_WINDOW_LEN: usize = 13;

/// Default accepted distance between `RequestDate` and the verifier clock.
pub const DEFAULT_MAX_SKEW: Duration = Duration::from_secs(2 * 60 * 60);

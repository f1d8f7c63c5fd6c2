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

use crate::constants::*;
use chainsign_core::{utils::Redact, Context};

/// Config carries all the configuration for the chained HMAC scheme.
#[derive(Clone, Default)]
pub struct Config {
    /// `token_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`BHE_TOKEN_ID`]
    pub token_id: Option<String>,
    /// `token_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`BHE_TOKEN_KEY`]
    pub token_key: Option<String>,
    /// `config_file` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`BHE_CONFIG_FILE`]
    /// - default: [`BHE_DEFAULT_CONFIG_FILE`]
    pub config_file: Option<String>,
    /// `profile` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`BHE_PROFILE`]
    /// - default: [`BHE_DEFAULT_PROFILE`]
    pub profile: Option<String>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set token_id
    pub fn with_token_id(mut self, token_id: impl Into<String>) -> Self {
        self.token_id = Some(token_id.into());
        self
    }

    /// Set token_key
    pub fn with_token_key(mut self, token_key: impl Into<String>) -> Self {
        self.token_key = Some(token_key.into());
        self
    }

    /// Set config_file
    pub fn with_config_file(mut self, config_file: impl Into<String>) -> Self {
        self.config_file = Some(config_file.into());
        self
    }

    /// Set profile
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Load config from env.
    ///
    /// Values already set on the config win over env values.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(BHE_TOKEN_ID) {
            self.token_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(BHE_TOKEN_KEY) {
            self.token_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(BHE_CONFIG_FILE) {
            self.config_file.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(BHE_PROFILE) {
            self.profile.get_or_insert(v);
        }

        self
    }

    /// Credential file path, falling back to [`BHE_DEFAULT_CONFIG_FILE`].
    pub fn config_file_or_default(&self) -> &str {
        self.config_file.as_deref().unwrap_or(BHE_DEFAULT_CONFIG_FILE)
    }

    /// Profile name, falling back to [`BHE_DEFAULT_PROFILE`].
    pub fn profile_or_default(&self) -> &str {
        self.profile.as_deref().unwrap_or(BHE_DEFAULT_PROFILE)
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token_id", &self.token_id)
            .field("token_key", &self.token_key.as_ref().map(Redact::from))
            .field("config_file", &self.config_file)
            .field("profile", &self.profile)
            .finish()
    }
}

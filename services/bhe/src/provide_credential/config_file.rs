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

use std::sync::Arc;

use async_trait::async_trait;
use chainsign_core::{Context, Error, ProvideCredential, Result};
use log::debug;

use crate::config::Config;
use crate::credential::Credential;

/// ConfigFileCredentialProvider loads credentials from an INI credential file.
///
/// The file is `~/.bhe/credentials` unless overridden by the config or `BHE_CONFIG_FILE`,
/// and the section read is `default` unless overridden by the config or `BHE_PROFILE`:
///
/// ```ini
/// [default]
/// token_id = a560f1b7-a33a-4ee9-b25b-473cce9815ea
/// token_key = <token key>
/// ```
///
/// A missing file, profile or key yields `Ok(None)`; a file that cannot be parsed is an error.
#[derive(Debug, Default)]
pub struct ConfigFileCredentialProvider {
    config: Arc<Config>,
}

impl ConfigFileCredentialProvider {
    /// Create a new ConfigFileCredentialProvider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the file and profile of the given config.
    pub fn with_config(mut self, config: Arc<Config>) -> Self {
        self.config = config;
        self
    }
}

#[async_trait]
impl ProvideCredential for ConfigFileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let config = self.config.as_ref().clone().from_env(ctx);

        let path = config.config_file_or_default();
        let expanded_path = ctx
            .expand_home_dir(path)
            .ok_or_else(|| Error::config_invalid(format!("failed to expand home dir in {path}")))?;

        let content = match ctx.file_read_as_string(&expanded_path).await {
            Ok(content) => content,
            Err(_) => {
                debug!("credential file not found at {expanded_path}");
                return Ok(None);
            }
        };

        let ini = ini::Ini::load_from_str(&content).map_err(|e| {
            Error::config_invalid(format!("failed to parse credential file {expanded_path}"))
                .with_source(e)
        })?;

        let profile = config.profile_or_default();
        let Some(section) = ini.section(Some(profile)) else {
            debug!("profile {profile} not found in credential file");
            return Ok(None);
        };

        match (section.get("token_id"), section.get("token_key")) {
            (Some(id), Some(key)) if !id.is_empty() && !key.is_empty() => {
                debug!("loading credential from credential file profile {profile}");
                Ok(Some(Credential::new(id, key)))
            }
            _ => {
                debug!("incomplete profile {profile} in credential file, skipping");
                Ok(None)
            }
        }
    }
}

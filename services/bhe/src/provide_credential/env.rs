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

use crate::{constants::*, Credential};
use async_trait::async_trait;
use chainsign_core::{Context, ProvideCredential, Result};
use log::debug;

/// EnvCredentialProvider loads credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `BHE_TOKEN_ID`: The token id, sent as key id
/// - `BHE_TOKEN_KEY`: The token key, used as shared secret
///
/// Empty values are treated as missing.
#[derive(Debug, Default)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let token_id = ctx.env_var(BHE_TOKEN_ID).filter(|v| !v.is_empty());
        let token_key = ctx.env_var(BHE_TOKEN_KEY).filter(|v| !v.is_empty());

        match (token_id, token_key) {
            (Some(id), Some(key)) => {
                debug!("loading credential from env");
                Ok(Some(Credential::new(id, key)))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainsign_core::StaticEnv;
    use std::collections::HashMap;

    fn ctx(envs: &[(&str, &str)]) -> Context {
        Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
    }

    #[tokio::test]
    async fn test_env_credential_provider() -> anyhow::Result<()> {
        let ctx = ctx(&[
            (BHE_TOKEN_ID, "a560f1b7-a33a-4ee9-b25b-473cce9815ea"),
            (BHE_TOKEN_KEY, "test_token_key"),
        ]);

        let cred = EnvCredentialProvider::new()
            .provide_credential(&ctx)
            .await?
            .expect("credential must be loaded");
        assert_eq!(cred.key_id, "a560f1b7-a33a-4ee9-b25b-473cce9815ea");
        assert_eq!(cred.secret_key, b"test_token_key");

        Ok(())
    }

    #[tokio::test]
    async fn test_env_credential_provider_partial_credentials() -> anyhow::Result<()> {
        let ctx = ctx(&[(BHE_TOKEN_ID, "a560f1b7-a33a-4ee9-b25b-473cce9815ea")]);

        let cred = EnvCredentialProvider::new().provide_credential(&ctx).await?;
        assert!(cred.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_env_credential_provider_empty_key() -> anyhow::Result<()> {
        let ctx = ctx(&[
            (BHE_TOKEN_ID, "a560f1b7-a33a-4ee9-b25b-473cce9815ea"),
            (BHE_TOKEN_KEY, ""),
        ]);

        let cred = EnvCredentialProvider::new().provide_credential(&ctx).await?;
        assert!(cred.is_none());

        Ok(())
    }
}

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

use crate::{Body, Context, ProvideCredential, Result, SignRequest, SigningCredential};
use log::debug;
use std::sync::{Arc, Mutex};

/// Signer is the main struct used to sign the request.
///
/// It caches the loaded credential in memory and reloads it only when the
/// cached one is no longer valid. Cloning a signer shares the cache.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    loader: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        loader: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,

            loader: Arc::new(loader),
            builder: Arc::new(builder),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// Sign the request parts, reading `body` without consuming it.
    ///
    /// After a successful call `body` still holds the original content, buffered in
    /// memory if it used to be a stream. On error nothing is added to `req`, and the
    /// request must not be sent.
    pub async fn sign(&self, req: &mut http::request::Parts, body: &mut Body) -> Result<()> {
        let credential = self.credential.lock().expect("lock poisoned").clone();
        let credential = if credential.is_valid() {
            credential
        } else {
            debug!("no valid credential cached, loading from provider");
            let credential = self.loader.provide_credential(&self.ctx).await?;
            *self.credential.lock().expect("lock poisoned") = credential.clone();
            credential
        };

        let content = body.buffer()?;

        self.builder
            .sign_request(&self.ctx, req, content.as_deref(), credential.as_ref())
            .await
    }

    /// Sign a whole request and hand it back ready for transmission.
    pub async fn sign_http(&self, req: http::Request<Body>) -> Result<http::Request<Body>> {
        let (mut parts, mut body) = req.into_parts();
        self.sign(&mut parts, &mut body).await?;
        Ok(http::Request::from_parts(parts, body))
    }
}

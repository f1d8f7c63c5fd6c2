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

use std::time::Duration;

use anyhow::{anyhow, Result};
use chainsign::bhe::{
    DefaultCredentialProvider, RequestSigner, RequestVerifier, StaticCredentialProvider,
};
use chainsign::{default_context, Body, ProvideCredential, Signer};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let ctx = default_context();

    // Credentials come from BHE_TOKEN_ID/BHE_TOKEN_KEY or ~/.bhe/credentials.
    let credential = DefaultCredentialProvider::new()
        .provide_credential(&ctx)
        .await?
        .ok_or_else(|| anyhow!("no bhe credential found in env or credential file"))?;

    let signer = Signer::new(
        ctx,
        StaticCredentialProvider::new(credential.key_id.clone(), credential.secret_key.clone()),
        RequestSigner::new(),
    );

    let req = http::Request::post("https://bhe.example.com/api/v2/file-upload/42")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"name":"test"}"#))?;
    let req = signer.sign_http(req).await?;

    for (name, value) in req.headers() {
        println!("{name}: {value:?}");
    }

    // The receiving side recomputes the chain with its own copy of the secret.
    let verifier = RequestVerifier::new(credential).with_max_skew(Duration::from_secs(5 * 60));

    let (parts, body) = req.into_parts();
    let body = body.into_bytes()?;
    let verified = verifier.verify(&parts, Some(&body[..]))?;
    println!("verified request from {}", verified.key_id);

    Ok(())
}

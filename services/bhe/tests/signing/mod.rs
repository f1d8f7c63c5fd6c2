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

use std::io::{self, Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chainsign_bhe::{Credential, DefaultCredentialProvider, RequestSigner};
use chainsign_core::{Body, Context, ErrorKind, ProvideCredential, Signer, StaticEnv};
use pretty_assertions::assert_eq;

use crate::{header, signer_at, time, KEY_ID};

const UPLOAD: &[u8] = br#"{"name":"test"}"#;

#[tokio::test]
async fn test_sign_get_without_body() {
    let signer = signer_at("2020-12-01T23:59:59Z");

    let req = http::Request::get("https://bhe.example.com/api/v2/test/resource")
        .body(Body::Empty)
        .unwrap();
    let req = signer.sign_http(req).await.expect("sign must succeed");
    let (parts, _) = req.into_parts();

    assert_eq!(
        header(&parts, "authorization"),
        format!("bhesignature {KEY_ID}")
    );
    assert_eq!(header(&parts, "requestdate"), "2020-12-01T23:59:59Z");
    assert_eq!(
        header(&parts, "signature"),
        "ZWi/6A/nkjQRj/mek8X81QBf+dGEKuYgFeiteQZQMn8="
    );
    assert!(header(&parts, "user-agent").starts_with("chainsign-bhe/"));
}

#[tokio::test]
async fn test_sign_same_hour_same_signature() {
    let at_start = signer_at("2020-12-01T23:00:00Z");
    let at_end = signer_at("2020-12-01T23:59:59Z");

    let mut signatures = Vec::new();
    for signer in [at_start, at_end] {
        let (mut parts, _) = http::Request::get("https://bhe.example.com/api/v2/test/resource")
            .body(())
            .unwrap()
            .into_parts();
        signer.sign(&mut parts, &mut Body::Empty).await.unwrap();
        signatures.push(header(&parts, "signature").to_string());
    }

    assert_eq!(signatures[0], signatures[1]);
}

#[tokio::test]
async fn test_sign_post_with_body() {
    let signer = signer_at("2020-12-01T23:59:59Z");

    let req = http::Request::post("https://bhe.example.com/api/v2/file-upload/42")
        .header("content-type", "application/json")
        .body(Body::from(UPLOAD))
        .unwrap();
    let req = signer.sign_http(req).await.expect("sign must succeed");
    let (parts, body) = req.into_parts();

    assert_eq!(
        header(&parts, "signature"),
        "6kVmSeiuKsbjWikF/LPFFLfZJ5w3EnqFbIaX2oqG81Q="
    );
    assert_eq!(header(&parts, "content-type"), "application/json");
    assert_eq!(body.into_bytes().unwrap().as_ref(), UPLOAD);
}

#[tokio::test]
async fn test_sign_with_query() {
    let signer = signer_at("2023-06-15T08:30:00Z");

    let req = http::Request::get("https://bhe.example.com/api/version?verbose=true")
        .body(Body::Empty)
        .unwrap();
    let req = signer.sign_http(req).await.unwrap();

    assert_eq!(
        req.headers()["signature"],
        "QC7FYN9INTso9t0LUvcJPWJh4gcXNQmqLYqwNGaS0dw="
    );
}

#[tokio::test]
async fn test_sign_streamed_body_is_kept() {
    let signer = signer_at("2020-12-01T23:59:59Z");

    let (mut parts, _) = http::Request::post("https://bhe.example.com/api/v2/file-upload/42")
        .body(())
        .unwrap()
        .into_parts();
    let mut body = Body::from_reader(Cursor::new(UPLOAD.to_vec()));

    signer.sign(&mut parts, &mut body).await.unwrap();

    assert_eq!(
        header(&parts, "signature"),
        "6kVmSeiuKsbjWikF/LPFFLfZJ5w3EnqFbIaX2oqG81Q="
    );
    assert!(body.is_buffered());
    assert_eq!(body.as_bytes().map(|bs| bs.as_ref()), Some(UPLOAD));
}

/// Reader failing once at `fail_at`, then yielding the rest.
struct FlakyReader {
    data: Vec<u8>,
    pos: usize,
    fail_at: usize,
    failed: bool,
}

impl Read for FlakyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.failed && self.pos >= self.fail_at {
            self.failed = true;
            return Err(io::Error::other("connection reset"));
        }

        let end = if self.failed {
            self.data.len()
        } else {
            self.fail_at
        };
        let n = buf.len().min(end - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

#[tokio::test]
async fn test_sign_body_read_failure() {
    let signer = signer_at("2020-12-01T23:59:59Z");

    let (mut parts, _) = http::Request::post("https://bhe.example.com/api/v2/file-upload/42")
        .body(())
        .unwrap()
        .into_parts();
    let mut body = Body::from_reader(FlakyReader {
        data: UPLOAD.to_vec(),
        pos: 0,
        fail_at: 5,
        failed: false,
    });

    let err = signer.sign(&mut parts, &mut body).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::BodyRead);
    assert!(parts.headers.is_empty(), "failed request must stay unsigned");
    assert!(!body.is_buffered());
    assert_eq!(body.into_bytes().unwrap().as_ref(), UPLOAD);
}

#[tokio::test]
async fn test_sign_without_credential() {
    crate::init_logger();

    let ctx = Context::new().with_env(StaticEnv::default());
    let signer = Signer::new(ctx, DefaultCredentialProvider::new(), RequestSigner::new());

    let (mut parts, _) = http::Request::get("https://bhe.example.com/api/v2/test/resource")
        .body(())
        .unwrap()
        .into_parts();
    let err = signer.sign(&mut parts, &mut Body::Empty).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert!(parts.headers.is_empty());
}

#[tokio::test]
async fn test_sign_with_custom_user_agent() {
    let signer = Signer::new(
        Context::new(),
        chainsign_bhe::StaticCredentialProvider::new(KEY_ID, crate::TOKEN_KEY),
        RequestSigner::new()
            .with_time(time("2020-12-01T23:59:59Z"))
            .with_user_agent("bhe-go-sdk 0001"),
    );

    let req = http::Request::get("https://bhe.example.com/api/v2/test/resource")
        .body(Body::Empty)
        .unwrap();
    let req = signer.sign_http(req).await.unwrap();

    assert_eq!(req.headers()["user-agent"], "bhe-go-sdk 0001");
    assert_eq!(
        req.headers()["signature"],
        "ZWi/6A/nkjQRj/mek8X81QBf+dGEKuYgFeiteQZQMn8="
    );
}

/// Hands out a key id that cannot be sent in a header first, then a usable one.
#[derive(Debug, Default)]
struct RotatingProvider {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ProvideCredential for RotatingProvider {
    type Credential = Credential;

    async fn provide_credential(
        &self,
        _: &Context,
    ) -> chainsign_core::Result<Option<Self::Credential>> {
        let key_id = match self.calls.fetch_add(1, Ordering::SeqCst) {
            0 => "key id",
            _ => KEY_ID,
        };
        Ok(Some(Credential::new(key_id, crate::TOKEN_KEY)))
    }
}

#[tokio::test]
async fn test_sign_reloads_unusable_key_id() {
    crate::init_logger();

    let calls = Arc::new(AtomicUsize::new(0));
    let signer = Signer::new(
        Context::new(),
        RotatingProvider {
            calls: calls.clone(),
        },
        RequestSigner::new().with_time(time("2020-12-01T23:59:59Z")),
    );

    let (mut parts, _) = http::Request::get("https://bhe.example.com/api/v2/test/resource")
        .body(())
        .unwrap()
        .into_parts();
    let err = signer.sign(&mut parts, &mut Body::Empty).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert!(parts.headers.is_empty());

    signer.sign(&mut parts, &mut Body::Empty).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(
        header(&parts, "authorization"),
        format!("bhesignature {KEY_ID}")
    );
    assert_eq!(
        header(&parts, "signature"),
        "ZWi/6A/nkjQRj/mek8X81QBf+dGEKuYgFeiteQZQMn8="
    );
}

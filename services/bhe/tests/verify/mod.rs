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

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chainsign_bhe::{Credential, RequestVerifier};
use chainsign_core::{Body, ErrorKind};
use pretty_assertions::assert_eq;

use crate::{signer_at, time, KEY_ID, TOKEN_KEY};

const SIGNED_AT: &str = "2020-12-01T23:59:59Z";

async fn signed_upload(body: &'static [u8]) -> (http::request::Parts, Vec<u8>) {
    let signer = signer_at(SIGNED_AT);

    let req = http::Request::post("https://bhe.example.com/api/v2/file-upload/42")
        .body(Body::from(body))
        .unwrap();
    let (parts, body) = signer.sign_http(req).await.unwrap().into_parts();

    (parts, body.into_bytes().unwrap().to_vec())
}

fn keys() -> Arc<HashMap<String, Credential>> {
    Arc::new(HashMap::from([
        (KEY_ID.to_string(), Credential::new(KEY_ID, TOKEN_KEY)),
        ("other".to_string(), Credential::new("other", "other-key")),
    ]))
}

#[tokio::test]
async fn test_verify_signed_request() {
    let (parts, body) = signed_upload(br#"{"name":"test"}"#).await;

    let verified = RequestVerifier::new(keys())
        .with_time(time("2020-12-02T00:30:00Z"))
        .verify(&parts, Some(&body[..]))
        .expect("verify must succeed");

    assert_eq!(verified.key_id, KEY_ID);
    assert_eq!(verified.request_date, time(SIGNED_AT));
}

#[tokio::test]
async fn test_verify_rejects_tampering() {
    let (mut parts, body) = signed_upload(br#"{"name":"test"}"#).await;
    let verifier = RequestVerifier::new(keys()).with_time(time(SIGNED_AT));

    let err = verifier
        .verify(&parts, Some(&br#"{"name":"evil"}"#[..]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureMismatch);

    parts.uri = "https://bhe.example.com/api/v2/file-upload/43".parse().unwrap();
    let err = verifier.verify(&parts, Some(&body[..])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureMismatch);

    parts.uri = "https://bhe.example.com/api/v2/file-upload/42".parse().unwrap();
    parts.method = http::Method::PUT;
    let err = verifier.verify(&parts, Some(&body[..])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureMismatch);
}

#[tokio::test]
async fn test_verify_host_is_not_signed() {
    let (mut parts, body) = signed_upload(br#"{"name":"test"}"#).await;
    parts.uri = "http://127.0.0.1:8080/api/v2/file-upload/42".parse().unwrap();

    let verified = RequestVerifier::new(keys())
        .with_time(time(SIGNED_AT))
        .verify(&parts, Some(&body[..]));

    assert!(verified.is_ok());
}

#[tokio::test]
async fn test_verify_skew() {
    let (parts, body) = signed_upload(b"").await;

    let err = RequestVerifier::new(keys())
        .with_time(time("2020-12-02T02:00:00Z"))
        .verify(&parts, Some(&body[..]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestExpired);

    let verified = RequestVerifier::new(keys())
        .with_time(time("2020-12-02T02:00:00Z"))
        .with_max_skew(Duration::from_secs(3 * 60 * 60))
        .verify(&parts, None);
    assert!(verified.is_ok(), "empty and absent bodies sign the same");
}

#[tokio::test]
async fn test_verify_unknown_or_wrong_key() {
    let (parts, body) = signed_upload(b"payload").await;

    let err = RequestVerifier::new(Credential::new("someone-else", TOKEN_KEY))
        .with_time(time(SIGNED_AT))
        .verify(&parts, Some(&body[..]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialDenied);

    let err = RequestVerifier::new(Credential::new(KEY_ID, "rotated-key"))
        .with_time(time(SIGNED_AT))
        .verify(&parts, Some(&body[..]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureMismatch);
}

#[tokio::test]
async fn test_sign_and_verify_concurrently() {
    let signer = signer_at(SIGNED_AT);
    let verifier = Arc::new(RequestVerifier::new(keys()).with_time(time(SIGNED_AT)));

    let mut tasks = Vec::new();
    for i in 0..16 {
        let signer = signer.clone();
        let verifier = verifier.clone();
        tasks.push(tokio::spawn(async move {
            let body = format!(r#"{{"id":{i}}}"#);
            let req = http::Request::post(format!(
                "https://bhe.example.com/api/v2/file-upload/{i}"
            ))
            .body(Body::from(body.clone()))
            .unwrap();

            let (parts, _) = signer.sign_http(req).await.unwrap().into_parts();
            verifier.verify(&parts, Some(body.as_bytes())).unwrap()
        }));
    }

    for task in tasks {
        let verified = task.await.expect("task must not panic");
        assert_eq!(verified.key_id, KEY_ID);
    }
}

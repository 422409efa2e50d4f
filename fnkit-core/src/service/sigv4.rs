// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! AWS Signature Version 4 request signing.
//!
//! Signs `host` and `x-amz-date` (plus the session token when present),
//! which is the minimum the function and logs APIs accept.

use std::fmt;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Static access credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl Credentials {
    /// Read `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and `AWS_SESSION_TOKEN`.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Some(Self {
            access_key_id: non_empty("AWS_ACCESS_KEY_ID")?,
            secret_access_key: non_empty("AWS_SECRET_ACCESS_KEY")?,
            session_token: non_empty("AWS_SESSION_TOKEN"),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// The parts of an HTTP request that take part in the signature.
#[derive(Debug, Clone, Copy)]
pub struct SigningRequest<'a> {
    pub method: &'a str,
    /// Host header value, including a non-default port.
    pub host: &'a str,
    pub path: &'a str,
    pub query: &'a str,
    pub payload: &'a [u8],
    pub region: &'a str,
    pub service: &'a str,
}

/// Compute the headers to add to the request: `x-amz-date`,
/// `x-amz-security-token` (when present) and `authorization`.
pub fn sign(
    credentials: &Credentials,
    request: &SigningRequest<'_>,
    now: DateTime<Utc>,
) -> Vec<(&'static str, String)> {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();

    let mut signed: Vec<(&'static str, String)> = vec![
        ("host", request.host.to_string()),
        ("x-amz-date", amz_date.clone()),
    ];
    if let Some(token) = &credentials.session_token {
        signed.push(("x-amz-security-token", token.clone()));
    }

    let canonical_headers: String = signed
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name, value.trim()))
        .collect();
    let signed_headers = signed
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(";");

    let canonical_request = format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        request.method,
        canonical_path(request.path),
        request.query,
        canonical_headers,
        signed_headers,
        hex::encode(Sha256::digest(request.payload)),
    );

    let scope = format!(
        "{}/{}/{}/aws4_request",
        date, request.region, request.service
    );
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        scope,
        hex::encode(Sha256::digest(canonical_request.as_bytes())),
    );

    let key = signing_key(
        &credentials.secret_access_key,
        &date,
        request.region,
        request.service,
    );
    let signature = hex::encode(hmac(&key, string_to_sign.as_bytes()));

    let authorization = format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM, credentials.access_key_id, scope, signed_headers, signature
    );

    let mut headers = vec![("x-amz-date", amz_date)];
    if let Some(token) = &credentials.session_token {
        headers.push(("x-amz-security-token", token.clone()));
    }
    headers.push(("authorization", authorization));
    headers
}

/// Derive the request signing key for a date (`YYYYMMDD`), region and service.
pub fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac(format!("AWS4{}", secret).as_bytes(), date.as_bytes());
    let k_region = hmac(&k_date, region.as_bytes());
    let k_service = hmac(&k_region, service.as_bytes());
    hmac(&k_service, b"aws4_request")
}

fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// URI-encode each path segment (the path is already percent-encoded once).
fn canonical_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    path.split('/')
        .map(|segment| {
            segment
                .bytes()
                .map(|b| match b {
                    b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                        (b as char).to_string()
                    }
                    _ => format!("%{:02X}", b),
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SECRET: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

    fn example_credentials() -> Credentials {
        Credentials {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: SECRET.to_string(),
            session_token: None,
        }
    }

    #[test]
    fn test_signing_key_derivation() {
        let key = signing_key(SECRET, "20120215", "us-east-1", "iam");
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn test_get_vanilla_signature() {
        let now = Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap();
        let request = SigningRequest {
            method: "GET",
            host: "example.amazonaws.com",
            path: "/",
            query: "",
            payload: b"",
            region: "us-east-1",
            service: "service",
        };

        let headers = sign(&example_credentials(), &request, now);
        let authorization = headers
            .iter()
            .find(|(name, _)| *name == "authorization")
            .map(|(_, value)| value.as_str())
            .unwrap();

        assert_eq!(
            authorization,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
             SignedHeaders=host;x-amz-date, \
             Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
        );
        assert!(headers.contains(&("x-amz-date", "20150830T123600Z".to_string())));
    }

    #[test]
    fn test_session_token_is_signed() {
        let mut credentials = example_credentials();
        credentials.session_token = Some("token-123".to_string());
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let request = SigningRequest {
            method: "POST",
            host: "lambda.eu-west-1.amazonaws.com",
            path: "/2015-03-31/functions",
            query: "",
            payload: b"{}",
            region: "eu-west-1",
            service: "lambda",
        };

        let headers = sign(&credentials, &request, now);
        assert!(headers.contains(&("x-amz-security-token", "token-123".to_string())));
        let authorization = &headers.last().unwrap().1;
        assert!(authorization.contains("SignedHeaders=host;x-amz-date;x-amz-security-token"));
        assert!(authorization.contains("/20240102/eu-west-1/lambda/aws4_request"));
    }

    #[test]
    fn test_canonical_path_encoding() {
        assert_eq!(canonical_path(""), "/");
        assert_eq!(
            canonical_path("/2015-03-31/functions/fn_1/code"),
            "/2015-03-31/functions/fn_1/code"
        );
        assert_eq!(canonical_path("/a%20b"), "/a%2520b");
    }

    #[test]
    fn test_credentials_from_lookup() {
        let env = |key: &str| match key {
            "AWS_ACCESS_KEY_ID" => Some("AKID".to_string()),
            "AWS_SECRET_ACCESS_KEY" => Some("s3cr3t-value".to_string()),
            "AWS_SESSION_TOKEN" => Some(String::new()),
            _ => None,
        };
        let credentials = Credentials::from_lookup(env).unwrap();
        assert_eq!(credentials.access_key_id, "AKID");
        assert!(credentials.session_token.is_none());
        assert!(!format!("{:?}", credentials).contains("s3cr3t-value"));

        assert!(Credentials::from_lookup(|_| None).is_none());
    }
}

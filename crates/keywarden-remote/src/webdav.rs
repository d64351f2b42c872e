// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blocking WebDAV implementation of [`BlobStore`].
//!
//! Uses the four operations the sync engine needs: PROPFIND (depth 0) for
//! stat, GET for read, PUT for write, and MOVE with `Overwrite: T` for
//! rename. Authentication is HTTP Basic with the two account strings
//! supplied at construction. A PUT answered with 404 or 409 (missing parent
//! collection) triggers one MKCOL of the parent followed by a single retry.

use std::time::Duration;

use keywarden_core::{KeywardenError, RemoteConfig};
use keywarden_vault::AuthData;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

/// Blocking WebDAV client for one account on one endpoint.
pub struct DavClient {
    http: Client,
    base_url: String,
    username: String,
    password: SecretString,
}

impl std::fmt::Debug for DavClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DavClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl DavClient {
    /// Build a client for the configured endpoint and account.
    pub fn new(config: &RemoteConfig, auth: &AuthData) -> Result<Self, KeywardenError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| KeywardenError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: auth.username.clone(),
            password: SecretString::from(auth.password.clone()),
        })
    }

    /// Verify the account credentials with a depth-0 PROPFIND of the root.
    pub fn check_auth(&self) -> Result<(), KeywardenError> {
        let response = self.send(self.request(dav_method("PROPFIND"), "").header("Depth", "0"))?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(status_error("", status))
        }
    }

    fn url(&self, path: &str) -> String {
        if path.is_empty() {
            format!("{}/", self.base_url)
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .basic_auth(&self.username, Some(self.password.expose_secret()))
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, KeywardenError> {
        request.send().map_err(|e| KeywardenError::Transport {
            message: format!("request failed: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Create the parent collection of `path`, tolerating "already exists".
    fn mkcol_parent(&self, path: &str) -> Result<(), KeywardenError> {
        let Some((parent, _)) = path.rsplit_once('/') else {
            return Ok(());
        };
        debug!(collection = parent, "creating remote collection");
        let response = self.send(self.request(dav_method("MKCOL"), parent))?;
        let status = response.status();
        // 405 Method Not Allowed is WebDAV for "collection already exists".
        if status.is_success() || status == StatusCode::METHOD_NOT_ALLOWED {
            Ok(())
        } else {
            Err(status_error(parent, status))
        }
    }

    fn put(&self, path: &str, data: &[u8]) -> Result<StatusCode, KeywardenError> {
        let response = self.send(self.request(Method::PUT, path).body(data.to_vec()))?;
        Ok(response.status())
    }
}

impl crate::store::BlobStore for DavClient {
    fn stat(&self, path: &str) -> Result<bool, KeywardenError> {
        let response = self.send(self.request(dav_method("PROPFIND"), path).header("Depth", "0"))?;
        let status = response.status();
        if status.is_success() {
            Ok(true)
        } else if status == StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            Err(status_error(path, status))
        }
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, KeywardenError> {
        let response = self.send(self.request(Method::GET, path))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(KeywardenError::NotFound { path: path.to_string() });
        }
        if !status.is_success() {
            return Err(status_error(path, status));
        }
        let body = response.bytes().map_err(|e| KeywardenError::Transport {
            message: format!("reading {path}: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(body.to_vec())
    }

    fn write(&self, path: &str, data: &[u8]) -> Result<(), KeywardenError> {
        let status = self.put(path, data)?;
        if status.is_success() {
            return Ok(());
        }
        // Missing parent collection: create it and retry once.
        if status == StatusCode::NOT_FOUND || status == StatusCode::CONFLICT {
            self.mkcol_parent(path)?;
            let status = self.put(path, data)?;
            if status.is_success() {
                return Ok(());
            }
            return Err(status_error(path, status));
        }
        Err(status_error(path, status))
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), KeywardenError> {
        let response = self.send(
            self.request(dav_method("MOVE"), from)
                .header("Destination", self.url(to))
                .header("Overwrite", "T"),
        )?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status == StatusCode::NOT_FOUND {
            Err(KeywardenError::NotFound { path: from.to_string() })
        } else {
            Err(status_error(from, status))
        }
    }
}

// WebDAV verbs reqwest has no constant for. The token is static and valid,
// so the parse cannot fail.
fn dav_method(name: &'static str) -> Method {
    Method::from_bytes(name.as_bytes()).expect("static WebDAV method token")
}

fn status_error(path: &str, status: StatusCode) -> KeywardenError {
    KeywardenError::transport(if path.is_empty() {
        format!("server returned {status}")
    } else {
        format!("{path}: server returned {status}")
    })
}

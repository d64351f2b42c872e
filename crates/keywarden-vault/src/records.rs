// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The vault record model: named service credentials.
//!
//! The JSON layout (field names, map keyed by service name) is shared with
//! vaults written by earlier versions, so it must not change shape.

use std::collections::BTreeMap;

use chrono::Utc;
use keywarden_core::KeywardenError;
use serde::{Deserialize, Serialize};

/// Credentials for one named service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub url: String,
}

impl ServiceRecord {
    /// Create an empty record for a service name.
    pub fn new(name: impl Into<String>) -> Self {
        let mut record = Self {
            name: name.into(),
            username: String::new(),
            password: String::new(),
            comment: String::new(),
            updated_at: String::new(),
            url: String::new(),
        };
        record.touch();
        record
    }

    /// Stamp `updated_at` with the current UTC time.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    }
}

/// The full record set, keyed by service name. A `BTreeMap` keeps the
/// serialized payload stable across saves.
pub type ServiceData = BTreeMap<String, ServiceRecord>;

/// Serialize the record set to the JSON payload the sync engine carries.
pub fn encode(data: &ServiceData) -> Result<Vec<u8>, KeywardenError> {
    serde_json::to_vec(data).map_err(|e| KeywardenError::Serialization(e.to_string()))
}

/// Parse a decrypted vault payload back into the record set.
pub fn decode(bytes: &[u8]) -> Result<ServiceData, KeywardenError> {
    serde_json::from_slice(bytes).map_err(|e| KeywardenError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrip() {
        let mut data = ServiceData::new();
        let mut record = ServiceRecord::new("github");
        record.username = "octocat".into();
        record.password = "s3cret".into();
        record.url = "https://github.com".into();
        data.insert(record.name.clone(), record);

        let bytes = encode(&data).unwrap();
        let parsed = decode(&bytes).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn decodes_payloads_written_by_the_original_format() {
        // Field names as written by old vaults; missing fields default.
        let payload = br#"{
            "mail": {
                "name": "mail",
                "username": "user@example.org",
                "password": "pw",
                "comment": "",
                "updated_at": "2019-03-01 12:00:00",
                "url": ""
            },
            "sparse": { "name": "sparse" }
        }"#;

        let data = decode(payload).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data["mail"].username, "user@example.org");
        assert_eq!(data["sparse"].password, "");
    }

    #[test]
    fn empty_vault_is_an_empty_json_object() {
        let bytes = encode(&ServiceData::new()).unwrap();
        assert_eq!(bytes, b"{}");
        assert!(decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn garbage_payload_is_a_serialization_error() {
        let result = decode(b"not json at all");
        assert!(matches!(result, Err(KeywardenError::Serialization(_))));
    }

    #[test]
    fn touch_stamps_a_sortable_timestamp() {
        let record = ServiceRecord::new("svc");
        // YYYY-MM-DD HH:MM:SS
        assert_eq!(record.updated_at.len(), 19);
        assert_eq!(record.updated_at.as_bytes()[4], b'-');
        assert_eq!(record.updated_at.as_bytes()[10], b' ');
    }
}

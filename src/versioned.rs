//! Versioned JSON decoding.
//!
//! Persisted payloads carry an integer `version` field. When a payload
//! written by an older release is loaded, it is upgraded in memory by
//! applying each schema migration in order before the typed parse runs.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{UnisearchError, UnisearchResult};

/// One schema upgrade step, applied to the untyped JSON object.
pub enum Migration {
    /// Nothing changed shape in this version.
    None,
    /// Mutate the payload in place (add/rename/remove keys, fill defaults).
    Transform(fn(&mut Map<String, Value>)),
}

/// A payload type with an ordered history of schema versions.
pub trait Versionable: DeserializeOwned {
    /// Version tag. Converts into the integer stored on the wire.
    type Version: Copy + Ord + Into<i64> + 'static;

    /// Every known version, in ascending declaration order.
    const VERSIONS: &'static [Self::Version];

    /// The version new payloads are written with.
    fn latest() -> Self::Version;

    /// The migration that upgrades a payload from the previous version to `to`.
    fn migrate(to: Self::Version) -> Migration;
}

/// Cheap pre-parse of just the version field.
#[derive(Deserialize)]
struct VersionContainer {
    version: i64,
}

/// Decodes a JSON payload of unknown historical version into its latest shape.
pub struct VersionedDecoder;

impl VersionedDecoder {
    pub fn decode<T: Versionable>(data: &[u8]) -> UnisearchResult<T> {
        debug_assert!(
            T::VERSIONS.windows(2).all(|pair| pair[0] < pair[1]),
            "schema versions must be declared in ascending order"
        );

        let container: VersionContainer = serde_json::from_slice(data).map_err(|e| {
            UnisearchError::Decode(format!("missing or invalid version field: {e}"))
        })?;

        let stored = T::VERSIONS
            .iter()
            .copied()
            .find(|version| (*version).into() == container.version)
            .ok_or_else(|| {
                UnisearchError::Decode(format!("unknown schema version {}", container.version))
            })?;

        if stored == T::latest() {
            return serde_json::from_slice(data).map_err(|e| UnisearchError::Decode(e.to_string()));
        }

        let mut payload: Map<String, Value> = serde_json::from_slice(data)
            .map_err(|e| UnisearchError::Decode(e.to_string()))?;

        for version in T::VERSIONS.iter().copied().filter(|version| *version > stored) {
            if let Migration::Transform(apply) = T::migrate(version) {
                apply(&mut payload);
            }
            let raw: i64 = version.into();
            payload.insert("version".to_string(), Value::from(raw));
        }

        serde_json::from_value(Value::Object(payload)).map_err(|e| {
            UnisearchError::Decode(format!("payload incompatible after migration: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum RecordVersion {
        V1 = 1,
        V2 = 2,
    }

    impl From<RecordVersion> for i64 {
        fn from(version: RecordVersion) -> i64 {
            version as i64
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Record {
        version: i64,
        label: String,
        #[serde(default)]
        enabled: bool,
    }

    impl Versionable for Record {
        type Version = RecordVersion;

        const VERSIONS: &'static [RecordVersion] = &[RecordVersion::V1, RecordVersion::V2];

        fn latest() -> RecordVersion {
            RecordVersion::V2
        }

        fn migrate(to: RecordVersion) -> Migration {
            match to {
                RecordVersion::V1 => Migration::None,
                // v2 renamed `title` to `label` and introduced `enabled`
                RecordVersion::V2 => Migration::Transform(|payload| {
                    if let Some(title) = payload.remove("title") {
                        payload.insert("label".to_string(), title);
                    }
                    payload.insert("enabled".to_string(), Value::Bool(true));
                }),
            }
        }
    }

    #[test]
    fn test_decode_latest_version_directly() {
        let data = br#"{"version": 2, "label": "current", "enabled": false}"#;
        let record: Record = VersionedDecoder::decode(data).unwrap();
        assert_eq!(
            record,
            Record {
                version: 2,
                label: "current".to_string(),
                enabled: false,
            }
        );
    }

    #[test]
    fn test_decode_migrates_old_version() {
        let data = br#"{"version": 1, "title": "legacy"}"#;
        let record: Record = VersionedDecoder::decode(data).unwrap();
        assert_eq!(
            record,
            Record {
                version: 2,
                label: "legacy".to_string(),
                enabled: true,
            }
        );
    }

    #[test]
    fn test_decode_rejects_missing_version() {
        let data = br#"{"label": "no version"}"#;
        let err = VersionedDecoder::decode::<Record>(data).unwrap_err();
        assert!(matches!(err, UnisearchError::Decode(_)));
    }

    #[test]
    fn test_decode_rejects_non_numeric_version() {
        let data = br#"{"version": "one", "label": "bad"}"#;
        let err = VersionedDecoder::decode::<Record>(data).unwrap_err();
        assert!(matches!(err, UnisearchError::Decode(_)));
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let data = br#"{"version": 9, "label": "future"}"#;
        let err = VersionedDecoder::decode::<Record>(data).unwrap_err();
        assert!(err.to_string().contains("unknown schema version 9"));
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        let err = VersionedDecoder::decode::<Record>(b"not json").unwrap_err();
        assert!(matches!(err, UnisearchError::Decode(_)));
    }

    #[test]
    fn test_decode_rejects_incompatible_payload_after_migration() {
        // v1 payload missing the field the migration renames, so the typed
        // parse at the end cannot find `label`
        let data = br#"{"version": 1, "unrelated": 3}"#;
        let err = VersionedDecoder::decode::<Record>(data).unwrap_err();
        assert!(err.to_string().contains("incompatible after migration"));
    }
}

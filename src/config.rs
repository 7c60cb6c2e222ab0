//! Configuration model shared by the editor GUI and the extension process.
//!
//! The GUI edits the command list and persists it wholesale; the extension
//! reads it back and addresses commands by position. Wire names stay in
//! camelCase so payloads written by earlier releases keep decoding.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::versioned::{Migration, Versionable};

/// Root persisted object: the ordered list of user-defined commands.
///
/// Ordering is significant. Commands are addressed by position, so it must
/// survive load/save cycles unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub commands: Vec<Command>,
    pub version: Version,
}

impl Configuration {
    /// Build a configuration stamped with the latest schema version.
    pub fn new(commands: Vec<Command>) -> Self {
        Self {
            commands,
            version: Self::latest(),
        }
    }
}

/// One user-defined search action: a menu label plus a URL template with a
/// `%s` substitution point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub name: String,
    pub url_template: String,
    #[serde(default)]
    pub options: Options,
}

/// Per-command text-processing flags, all off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    #[serde(default)]
    pub should_escape_for_regex: bool,
    #[serde(default)]
    pub should_escape_double_quotes: bool,
    #[serde(default)]
    pub should_percent_encode_full_url: bool,
}

/// Schema version tags, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Version {
    V1 = 1,
    V2 = 2,
}

impl From<Version> for i64 {
    fn from(version: Version) -> i64 {
        version as i64
    }
}

impl TryFrom<i64> for Version {
    type Error = String;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(Version::V1),
            2 => Ok(Version::V2),
            other => Err(format!("unknown schema version {other}")),
        }
    }
}

impl Versionable for Configuration {
    type Version = Version;

    const VERSIONS: &'static [Version] = &[Version::V1, Version::V2];

    fn latest() -> Version {
        Version::V2
    }

    fn migrate(to: Version) -> Migration {
        match to {
            Version::V1 => Migration::None,
            Version::V2 => Migration::Transform(add_full_url_option),
        }
    }
}

/// V1 commands predate the full-url option; fill the new flag in as disabled.
fn add_full_url_option(payload: &mut Map<String, Value>) {
    if let Some(Value::Array(commands)) = payload.get_mut("commands") {
        for command in commands {
            if let Some(Value::Object(options)) = command.get_mut("options") {
                options
                    .entry("shouldPercentEncodeFullUrl")
                    .or_insert(Value::Bool(false));
            }
        }
    }
}

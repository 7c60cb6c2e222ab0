//! Unisearch - open a search URL built from the current text selection.
//!
//! A user defines named search commands, each pairing a menu label with a
//! URL template containing a `%s` placeholder. The editor GUI edits that
//! list; the editor extension reads it back, substitutes the current text
//! selection into the chosen template, and opens the result. Both processes
//! share one persisted configuration record.
//!
//! # Architecture
//!
//! - [`config`] - Configuration model (commands, options, schema versions)
//! - [`versioned`] - Versioned JSON decoding with ordered migrations
//! - [`store`] - Shared persistence for the configuration record
//! - [`url`] - URL template engine (escaping, substitution, encoding)
//! - [`registry`] - Extension-side command registration and invocation
//! - [`cli`] - Command-line front end standing in for the GUI

pub mod cli;
pub mod config;
pub mod registry;
pub mod store;
pub mod url;
pub mod versioned;

mod error;

// Re-export commonly used types for convenience
pub use config::{Command, Configuration, Options, Version};
pub use error::{UnisearchError, UnisearchResult};
pub use registry::CommandDefinition;
pub use store::ConfigStore;
pub use url::{build_url, PLACEHOLDER_TOKEN};
pub use versioned::{Migration, Versionable, VersionedDecoder};

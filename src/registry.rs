//! Extension-side command registration and invocation.
//!
//! The host editor registers one menu entry per stored command. Entries are
//! identified as `<bundle-id>.<index>`; at invocation time the index is
//! parsed back out of the identifier and resolved positionally against the
//! stored list.

use crate::config::Configuration;
use crate::error::{UnisearchError, UnisearchResult};
use crate::store::ConfigStore;
use crate::url;

/// Menu label registered when stored configuration cannot be read.
const LOAD_FAILURE_LABEL: &str = "-- Internal extension error loading from storage --";

/// One menu entry handed to the host at registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDefinition {
    pub identifier: String,
    pub name: String,
}

/// Identifier for the command at `index`.
pub fn command_identifier(bundle_id: &str, index: i64) -> String {
    format!("{bundle_id}.{index}")
}

/// Recover the positional index from a registered identifier.
pub fn parse_command_index(identifier: &str) -> UnisearchResult<usize> {
    identifier
        .rsplit('.')
        .next()
        .unwrap_or(identifier)
        .parse::<usize>()
        .map_err(|_| {
            UnisearchError::Command(format!("malformed command identifier '{identifier}'"))
        })
}

/// Menu entries for every stored command, in stored order.
///
/// A load failure yields a single sentinel entry whose label surfaces the
/// problem in the host's menu; its identifier never parses as an index, so
/// invoking it reports an error instead of opening anything.
pub fn menu_definitions(bundle_id: &str, store: &ConfigStore) -> Vec<CommandDefinition> {
    let configuration = match store.load() {
        Ok(Some(configuration)) => configuration,
        Ok(None) => return Vec::new(),
        Err(e) => {
            eprintln!("[Unisearch] Failed to load configuration: {e}");
            return vec![CommandDefinition {
                identifier: command_identifier(bundle_id, -1),
                name: LOAD_FAILURE_LABEL.to_string(),
            }];
        }
    };

    configuration
        .commands
        .iter()
        .enumerate()
        .map(|(index, command)| CommandDefinition {
            identifier: command_identifier(bundle_id, index as i64),
            name: command.name.clone(),
        })
        .collect()
}

/// Build the URL for the command at a positional index.
///
/// Indices can go stale when the list is edited between registration and
/// invocation; out-of-range lookups are reported, not panicked on.
pub fn build_for_command(
    configuration: &Configuration,
    index: usize,
    selection: &str,
) -> UnisearchResult<String> {
    let command = configuration.commands.get(index).ok_or_else(|| {
        UnisearchError::Command(format!(
            "no command at index {index}; the stored list may have changed since registration"
        ))
    })?;

    url::build_url(&command.url_template, selection, &command.options)
}

/// Full invocation path: load, resolve, build, open. Returns the opened URL.
pub fn invoke(store: &ConfigStore, identifier: &str, selection: &str) -> UnisearchResult<String> {
    let configuration = store
        .load()?
        .ok_or_else(|| UnisearchError::Command("no commands are configured".to_string()))?;

    let index = parse_command_index(identifier)?;
    let built = build_for_command(&configuration, index, selection)?;
    open_url(&built)?;
    Ok(built)
}

/// Hand a built URL to the OS opener.
pub fn open_url(url: &str) -> UnisearchResult<()> {
    open::that(url).map_err(|e| UnisearchError::Template(format!("failed to open '{url}': {e}")))
}

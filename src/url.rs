//! URL template engine.
//!
//! Builds the URL to open from a command's template, the selected text, and
//! the command's text-processing options. The literal token `%s` marks the
//! substitution point; every occurrence is replaced.

use crate::config::Options;
use crate::error::{UnisearchError, UnisearchResult};

/// Substitution marker recognized inside URL templates.
pub const PLACEHOLDER_TOKEN: &str = "%s";

/// Percent-free stand-in for the placeholder while the template's own
/// percent-encoding is stripped.
const SENTINEL: &str = "{{selection-token}}";

/// Characters the URL query-allowed set leaves unescaped, besides ASCII
/// alphanumerics.
const QUERY_ALLOWED: &[u8] = b"!$&'()*+,-./:;=?@_~";

/// Build the final URL string for one command invocation.
///
/// The selection is transformed per `options` (regex escaping first, quote
/// escaping second) and substituted for `%s`. In the default mode the
/// selection is percent-encoded as a query component and the rest of the
/// template is returned verbatim. With `should_percent_encode_full_url` the
/// template's existing percent-encoding is stripped and the whole resulting
/// string is encoded exactly once with the query-allowed set.
pub fn build_url(template: &str, selection: &str, options: &Options) -> UnisearchResult<String> {
    let processed = process_selection(selection, options);

    if options.should_percent_encode_full_url {
        let decoded = remove_percent_encoding(template)?;
        Ok(encode_query_allowed(
            &decoded.replace(PLACEHOLDER_TOKEN, &processed),
        ))
    } else {
        let encoded = urlencoding::encode(&processed);
        Ok(template.replace(PLACEHOLDER_TOKEN, &encoded))
    }
}

/// Strip percent-encoding from a template without touching the placeholder.
///
/// The token is swapped for a percent-free sentinel before decoding so its
/// own `%s` cannot be misread as an escape sequence, then restored after.
/// A template without percent sequences passes through unchanged.
pub fn remove_percent_encoding(template: &str) -> UnisearchResult<String> {
    let protected = template.replace(PLACEHOLDER_TOKEN, SENTINEL);
    let decoded = urlencoding::decode(&protected).map_err(|e| {
        UnisearchError::Encoding(format!("template is not valid UTF-8 once decoded: {e}"))
    })?;
    Ok(decoded.replace(SENTINEL, PLACEHOLDER_TOKEN))
}

/// Percent-encode every byte outside the URL query-allowed set.
pub fn encode_query_allowed(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &byte in input.as_bytes() {
        if byte.is_ascii_alphanumeric() || QUERY_ALLOWED.contains(&byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

fn process_selection(selection: &str, options: &Options) -> String {
    let mut result = selection.to_string();

    if options.should_escape_for_regex {
        result = regex::escape(&result);
    }

    if options.should_escape_double_quotes {
        result = result.replace('"', "\\\"");
    }

    result
}

// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bridges Figment deserialization failures into miette diagnostics.
//!
//! Unknown-key errors get a source span pointing at the offending line of the
//! TOML file plus a "did you mean?" suggestion computed with Jaro-Winkler
//! similarity (`strsim`).

#![allow(unused_assignments)] // the Diagnostic derive expands to code that trips this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a candidate key must beat before it is offered as a
/// "did you mean?" suggestion. 0.75 catches one-letter typos such as
/// `moed` -> `mode` without suggesting unrelated keys.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Errors produced while loading or validating configuration.
///
/// Variants carry the context miette needs to render an Elm-style report:
/// source spans, the list of valid keys, and a fuzzy-match suggestion.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key the config model does not define.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(rota::config::unknown_key),
        help("{}", unknown_key_help(suggestion, valid_keys))
    )]
    UnknownKey {
        /// The unrecognized key name.
        key: String,
        /// Closest valid key, if one scored above the suggestion threshold.
        suggestion: Option<String>,
        /// Comma-separated valid keys for the enclosing section.
        valid_keys: String,
        /// Where the key sits in the TOML source, when we could locate it.
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        /// The TOML file content, for span rendering.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong TOML type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(
        code(rota::config::invalid_type),
        help("expected {expected}")
    )]
    InvalidType {
        /// Dotted path of the key with the wrong type.
        key: String,
        /// What was found versus what the model wants.
        detail: String,
        /// The expected type name.
        expected: String,
        /// Where the value sits in the TOML source.
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        /// The TOML file content, for span rendering.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A key the config model requires but the sources never supplied.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(rota::config::missing_key),
        help("add `{key} = <value>` to your rota.toml")
    )]
    MissingKey {
        /// The missing key name.
        key: String,
    },

    /// A semantic constraint violated by an otherwise well-formed config.
    #[error("validation error: {message}")]
    #[diagnostic(code(rota::config::validation))]
    Validation {
        /// Description of the violated constraint.
        message: String,
    },

    /// Any figment error we do not classify more precisely.
    #[error("configuration error: {0}")]
    #[diagnostic(code(rota::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: &Option<String>, valid_keys: &str) -> String {
    match suggestion {
        Some(candidate) => format!("did you mean `{candidate}`? valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a `figment::Error` into one `ConfigError` per underlying failure.
///
/// Figment reports every problem it found in a single error value; each is
/// classified separately so the operator sees the full list at once.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| classify(error, toml_sources))
        .collect()
}

fn classify(error: figment::Error, toml_sources: &[(String, String)]) -> ConfigError {
    use figment::error::Kind;

    match &error.kind {
        Kind::UnknownField(field, expected) => {
            let suggestion = suggest_key(field, expected);
            let (span, src) = locate_in_sources(&error, field, toml_sources);
            ConfigError::UnknownKey {
                key: field.clone(),
                suggestion,
                valid_keys: expected.join(", "),
                span,
                src,
            }
        }
        Kind::MissingField(field) => ConfigError::MissingKey {
            key: field.to_string(),
        },
        Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
            key: error.path.join("."),
            detail: format!("found {actual}, expected {expected}"),
            expected: expected.to_string(),
            span: None,
            src: None,
        },
        _ => ConfigError::Other(error.to_string()),
    }
}

/// Resolve an error to a span in one of the loaded TOML sources.
///
/// Figment records which file each value came from; when that file is among
/// `toml_sources` and the key can be found in its text, both the span and the
/// named source are returned for miette to render.
fn locate_in_sources(
    error: &figment::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let wanted = error.metadata.as_ref().and_then(|m| match &m.source {
        Some(figment::Source::File(path)) => Some(path.display().to_string()),
        _ => None,
    });

    let located = wanted.and_then(|wanted| {
        toml_sources
            .iter()
            .find(|(path, _)| *path == wanted)
            .map(|(path, content)| (path.as_str(), content.as_str()))
    });

    if let Some((path, content)) = located {
        if let Some(offset) = find_key_offset(content, &error.path, field) {
            return (
                Some(SourceSpan::new(offset.into(), field.len())),
                Some(NamedSource::new(path, content.to_string())),
            );
        }
    }

    (None, None)
}

/// Find the byte offset of `field` in TOML text, scoped to a section path.
///
/// For `path = ["twilio"]` the search starts after the `[twilio]` header;
/// with an empty path it starts at the top of the file. Only a key followed
/// by `=` counts, so keys that merely share a prefix do not match.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let body_start = match path.first() {
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    let mut cursor = body_start;
    for line in content[body_start..].split_inclusive('\n') {
        let key = line.trim_start();
        if let Some(rest) = key.strip_prefix(field) {
            if rest.trim_start().starts_with('=') {
                return Some(cursor + (line.len() - key.len()));
            }
        }
        cursor += line.len();
    }

    None
}

/// Pick the valid key most similar to an unknown one.
///
/// Scores every candidate with Jaro-Winkler and keeps the best one above
/// [`SUGGESTION_THRESHOLD`]; returns `None` when nothing comes close.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|&key| (key, strsim::jaro_winkler(unknown, key)))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(key, _)| key.to_string())
}

/// Render diagnostics to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{rendered}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}

//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Error types for the format registry and the dump/load facade.
//!
//! Everything in this crate fails synchronously to the immediate caller with
//! a variant of [`Error`]; nothing is retried or recovered internally.
//! Errors produced by a backend crate during an actual dump or load are
//! carried unmodified as the source of [`Error::Dump`] or [`Error::Load`].

use std::error::Error as StdError;
use std::io;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for registry lookups, registration, and dump/load
/// operations.
///
/// # Examples
///
/// ```rust
/// use anyformat::{Error, Value};
///
/// let err = anyformat::dumps(&Value::Int(1), "no-such-format").unwrap_err();
/// assert!(matches!(err, Error::UnknownFormat { .. }));
/// ```
#[derive(Debug, Error)]
pub enum Error {
    /// The requested format name is not registered anywhere.
    #[error("'{name}' is an unknown format; valid options are: {}", .known.join(", "))]
    UnknownFormat {
        /// The name that was requested.
        name: String,
        /// The names of all currently registered formats.
        known: Vec<String>,
    },

    /// The requested format is known but its backend could not be used in
    /// this build or environment.
    #[error("'{name}' is an unavailable format: {message}")]
    UnavailableFormat {
        /// The name that was requested.
        name: String,
        /// The recorded human-readable reason, typically naming the missing
        /// backend crate.
        message: String,
    },

    /// The file extension is not claimed by any registered format.
    #[error("'{extension}' is an unknown extension; valid options are: {}", .known.join(", "))]
    UnknownExtension {
        /// The extension that was looked up (lowercased, no leading dot).
        extension: String,
        /// All currently claimed extensions.
        known: Vec<String>,
    },

    /// An attempt was made to register a format name twice.
    ///
    /// Formats are immutable once registered; the first registration's
    /// operations remain in effect.
    #[error("format '{name}' is already registered")]
    DuplicateFormat {
        /// The contested format name.
        name: String,
    },

    /// The format was registered with neither the buffer nor the stream
    /// operation for this direction.
    ///
    /// Raised when the operation is actually invoked, not at registration
    /// time, so placeholder formats stay addressable by name.
    #[error("{operation} is not defined for format '{format}'")]
    NotImplemented {
        /// The format whose operation is missing.
        format: String,
        /// The missing operation pair, `"dump/dumps"` or `"load/loads"`.
        operation: &'static str,
    },

    /// An I/O error while reading or writing a stream or file.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// The backend failed to serialize the (already fully primitive) value.
    #[error("{format} serialization failed: {source}")]
    Dump {
        /// The format whose backend failed.
        format: String,
        /// The backend's own error, unmodified.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The backend failed to deserialize the input.
    #[error("{format} deserialization failed: {source}")]
    Load {
        /// The format whose backend failed.
        format: String,
        /// The backend's own error, unmodified.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// A registered `from_plain` converter rejected a marker payload.
    #[error("cannot rebuild '{identity}' from its payload: {reason}")]
    Reconstruct {
        /// The class identity string carried by the marker.
        identity: String,
        /// Why the payload could not be converted back.
        reason: String,
    },
}

impl Error {
    /// Wraps a backend serialization error for the named format.
    pub fn dump(format: impl Into<String>, source: impl StdError + Send + Sync + 'static) -> Self {
        Self::Dump {
            format: format.into(),
            source: Box::new(source),
        }
    }

    /// Wraps a backend deserialization error for the named format.
    pub fn load(format: impl Into<String>, source: impl StdError + Send + Sync + 'static) -> Self {
        Self::Load {
            format: format.into(),
            source: Box::new(source),
        }
    }

    /// Builds a [`Error::Reconstruct`] for a `from_plain` converter that
    /// received an unexpected payload shape.
    pub fn reconstruct(identity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Reconstruct {
            identity: identity.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_format_lists_known_names() {
        let err = Error::UnknownFormat {
            name: "xml".to_string(),
            known: vec!["json".to_string(), "yaml".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'xml'"));
        assert!(msg.contains("json, yaml"));
    }

    #[test]
    fn test_dump_error_preserves_source() {
        let source = io::Error::other("backend exploded");
        let err = Error::dump("json", source);
        assert!(err.to_string().contains("json serialization failed"));
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn test_not_implemented_names_format_and_operation() {
        let err = Error::NotImplemented {
            format: "null".to_string(),
            operation: "dump/dumps",
        };
        assert_eq!(err.to_string(), "dump/dumps is not defined for format 'null'");
    }
}

// Error taxonomy for the API client. `FileNotFound` is raised before any
// network activity; `Connection` and `Transport` split "could not reach the
// server" from "the exchange itself failed". A non-2xx HTTP status is not
// represented here at all: response bodies come back as data whatever the
// status, and it is up to the caller to inspect the status code.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by `ApiClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The local file to upload is missing or unreadable. No request is
    /// sent when this happens.
    #[error("cannot read file {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The server could not be reached: connection refused, DNS failure
    /// or a timed-out connect.
    #[error("cannot reach {url}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request was sent but the exchange failed at the protocol level,
    /// including a response body that could not be read.
    #[error("transport failure talking to {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The caller-supplied content type is not a parseable MIME string.
    #[error("invalid content type {mime:?}")]
    InvalidContentType { mime: String },
}

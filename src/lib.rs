// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive CLI.
//
// Module responsibilities:
// - `api`: Encapsulates HTTP interactions with a Langflow server (file
//   uploads, flow runs) and the response helpers around them.
// - `error`: The error taxonomy returned by `api`.
// - `ui`: Implements the terminal-based user interface flows and
//   delegates requests to `api`.
pub mod api;
pub mod error;
pub mod ui;

//! Financial Node Assistant
//!
//! An interactive CLI that:
//! - Uploads a PDF business plan to the Gemini File API
//! - Asks the model for structured financial "nodes" (transactions,
//!   constraints, timing rules) under a fixed response schema
//! - Supports free-form chat about the uploaded document
//! - Surfaces model thought traces for transparency
//!
//! LOOP: READ LINE → PARSE COMMAND → BUILD REQUEST → CALL MODEL → RENDER

pub mod config;
pub mod error;
pub mod gemini;
pub mod models;
pub mod render;
pub mod repl;
pub mod request;
pub mod schema;
pub mod session;

pub use error::Result;

// Re-export common types
pub use models::{LedgerEntry, Node, Transaction};
pub use repl::{Command, Repl};

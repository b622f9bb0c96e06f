//! Snapshot-based undo/redo editing sessions.
//!
//! An [`Editor`] owns a [`Document`] and a linear history of
//! [`EditCommand`]s. Each command remembers the document content from before
//! it ran, so undo is always a full restore of that content.

pub mod config;
pub mod document_model;
pub mod edit_commands;
pub mod editor;
pub mod script;
pub mod search;
pub mod session;
pub mod undo;

pub use document_model::Document;
pub use edit_commands::{AppendText, EditCommand, RemoveTrailing, ReplaceRange, Substitute};
pub use editor::Editor;

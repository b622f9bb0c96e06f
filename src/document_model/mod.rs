/// Document model subsystem - the text buffer edited by commands

pub mod document;

pub use document::Document;

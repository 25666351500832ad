//! Editor host: a live editing session over a rich-text engine
//!
//! The engine itself is a collaborator behind [`EditorEngine`];
//! [`DocumentEngine`] is an in-memory implementation used by the command line
//! tools and tests.

mod command;
mod engine;
mod host;
mod upload;

pub use command::{BlockType, EditorCommand, MarkKind};
pub use engine::{DocumentEngine, EditorEngine};
pub use host::EditorHost;
pub use upload::{ImageFile, ImageUploader};

pub mod editing;
pub mod io;
pub mod models;

// Re-export key types for easier usage
pub use editing::{
    Block, BlockId, Cmd, Cursor, DeleteAction, DeleteOutcome, Focus, KeyInput, Outline, Patch,
};
pub use models::{Document, DocumentId, DocumentSummary};

//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (HTTP, filesystem, audio hardware).
//!
//! # Structure
//!
//! - `record` - Synthesis records, ids, and audio locators
//! - `format` - Audio output format selection
//! - `session` - Transient session state and status reporting

pub mod format;
pub mod record;
pub mod session;

// Re-export domain types at the domain level for convenience
pub use format::{AudioFormat, UnknownFormat};
pub use record::{AudioSource, IdMinter, RecordId, SynthesisRecord};
pub use session::{SessionState, StatusLine, StoredPreferences};

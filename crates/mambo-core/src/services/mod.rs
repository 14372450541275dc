//! Core services.
//!
//! - `history` - Bounded, durable synthesis history
//! - `preferences` - Credential and format persistence
//! - `arbiter` - Mutual exclusion over the playback device
//! - `session` - The session controller composing the above

pub mod arbiter;
pub mod history;
pub mod preferences;
pub mod session;

pub use arbiter::{PlaybackArbiter, PlaybackState};
pub use history::{HISTORY_CAP, HistoryService};
pub use preferences::PreferenceService;
pub use session::{SessionController, SessionDeps};

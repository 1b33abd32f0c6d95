//! Core domain types for the GetUFit terminal client.
//!
//! Everything in this crate is pure data and state: the onboarding profile,
//! the persisted session record, the weekly fitness plan, the chat flow, and
//! the de-fencing parser that digs machine-readable JSON out of free-text
//! coach replies. No I/O happens here; the HTTP side lives in `getufit-api`
//! and persistence in `getufit-session`.

pub mod chat;
pub mod fence;
pub mod plan;
pub mod profile;
pub mod session;

pub use chat::{ChatFlow, ChatMessage, ChatState, Sender, SendRejection};
pub use plan::{Activity, Exercise, FitnessPlan};
pub use profile::{Experience, Goal, ProfileError, UserProfile};
pub use session::{SessionRecord, UserData};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

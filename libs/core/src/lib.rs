//! Call disposition core contracts and value types.
//!
//! This crate exposes the data exchanged between the agent panel, the relay
//! and the downstream automation webhook: the submission record, the closed
//! disposition set, the downstream event envelope and the relay reply bodies.
//! It also holds the defaulting and validation rules both sides share.
pub mod cors;
pub mod disposition;
pub mod envelope;
pub mod record;
pub mod reply;
pub mod timestamp;
pub mod validate;

pub use cors::*;
pub use disposition::*;
pub use envelope::*;
pub use record::*;
pub use reply::*;
pub use timestamp::*;
pub use validate::*;

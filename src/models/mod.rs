//! Data models for the conference backend.
//!
//! Field names serialize in camelCase so stored documents and the frontend
//! share one shape.

mod agenda;
mod branding;
mod message;
mod ordering;
mod poll;
mod registration;
mod sponsor;
mod tab;
mod venue;

pub use agenda::*;
pub use branding::*;
pub use message::*;
pub use ordering::*;
pub use poll::*;
pub use registration::*;
pub use sponsor::*;
pub use tab::*;
pub use venue::*;

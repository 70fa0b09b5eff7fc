//! Types shared by every Meadowlark crate.

pub mod pii;

pub use pii::{redact_email, Masked};

//! Domain values shared by every quest crate.
//!
//! The crate has two halves:
//! - typed challenge values ([`Challenge`], [`NewChallenge`], progress views) that cross
//!   the HTTP boundary;
//! - the loosely-typed document shape ([`Record`], [`FieldValue`]) exchanged with
//!   document stores.

mod domain;
pub use domain::*;

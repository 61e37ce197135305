//! Domain types and rules for the portfolio contact backend.
//!
//! Nothing in here touches the network or the database; the `db`, `notify`
//! and `api` crates build on these types.

pub mod contact;
pub mod error;
pub mod types;

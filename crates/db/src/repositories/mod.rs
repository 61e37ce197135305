//! Query functions grouped by table. Each repository is a unit struct with
//! associated async functions taking the pool explicitly.

pub mod contact_repo;

pub use contact_repo::ContactRepo;

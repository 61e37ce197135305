pub mod contact;
pub mod diagnostics;

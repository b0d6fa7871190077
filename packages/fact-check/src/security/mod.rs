//! Credential handling.

mod credential;

pub use credential::Credential;

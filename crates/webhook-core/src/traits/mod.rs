//! Core traits for the webhook
//!
//! - [`RegistrarAdapter`]: List and mutate records at a DNS registrar

pub mod registrar;

pub use registrar::RegistrarAdapter;

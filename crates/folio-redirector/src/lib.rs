//! The redirect resolver.
//!
//! [`RedirectorService`] looks a short code up in the mapping store and
//! returns the record to redirect to, or `None` when the code is unknown,
//! malformed or past its retention window.

pub mod service;

pub use service::RedirectorService;

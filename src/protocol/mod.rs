//! Remote client abstraction
//!
//! The filesystem adapter never speaks a wire protocol itself. It drives a
//! [`RemoteClient`], which performs whole-object transfers and the handful of
//! metadata operations a WebDAV server offers. Concrete clients live in
//! [`crate::backends`]; an HTTP implementation is provided outside this crate.

pub mod client;

pub use client::{RemoteClient, RemoteError, RemoteResult};

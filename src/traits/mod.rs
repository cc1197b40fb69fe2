//! Capability traits for file handles
//!
//! A handle is described by what it can do rather than by a stream base
//! type. Whether a given capability is usable is decided by the open mode;
//! calling a capability the mode does not grant fails with a typed error.

pub mod file;

pub use file::{Closable, Readable, Seekable, Whence, Writable};

//! An abstraction layer for host-provided text generation.
//!
//! A chat surface never talks to a concrete language model directly.
//! Instead it is handed a [`TextGenerationProvider`], which can be asked
//! for a short-lived [`TextSession`]. Each session answers prompts and is
//! released once the caller is done with it.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to. Test doubles and
//! real backends live in their own crates.

#![deny(missing_docs)]

mod error;
mod provider;
mod response;

pub use error::*;
pub use provider::*;
pub use response::*;

//! This crate is a part of **[renoform]**.
//!
//! Finds a Renovate configuration file given a direct link to it, a link to
//! it in the GitHub web UI, or just a link to the repository it lives in.
//!
//! [renoform]: https://github.com/exoumoon/renoform

#![allow(clippy::missing_errors_doc)]

mod candidate;
mod error;
mod fetch;
pub mod persist;
mod relaxed;
mod resolver;
mod sequence;
pub mod settings;
pub use candidate::*;
pub use error::*;
pub use fetch::*;
pub use relaxed::*;
pub use resolver::*;
pub use sequence::*;

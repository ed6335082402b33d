//! This crate is a part of **[renoform]**.
//!
//! It holds the editing session for a single configuration document: a
//! [`ConfigForm`] keeps the document, its raw text representation and the
//! current [`ViewMode`] consistent with each other, and produces the
//! minimized document on export.
//!
//! ```text
//!              switch_to_raw_text()
//!   Structured ───────────────────────▶ RawText
//!       ▲                                  │
//!       └──────────────────────────────────┤ switch_to_structured()
//!                 parse ok                 │
//!                                          └─▶ stays RawText on a parse error
//! ```
//!
//! [renoform]: https://github.com/exoumoon/renoform

mod error;
mod export;
mod form;
pub use error::*;
pub use export::*;
pub use form::*;

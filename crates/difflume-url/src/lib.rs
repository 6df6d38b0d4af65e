//! URL handling for DiffLume content sources.
//!
//! Splits a URL into its six generic components, lets callers rewrite
//! individual components, and reassembles the result. No network or
//! filesystem access happens here; everything is a pure string transform.
//!
//! # Key Types
//!
//! - [`UrlParts`] -- scheme, netloc, path, params, query, and fragment
//! - [`parse`] / [`build`] -- free-function forms of the split/join pair
//!
//! # Round Trip
//!
//! For any well-formed URL whose path needs no re-encoding,
//! `build(&parse(u), false) == u`.

pub mod error;
pub mod parts;

pub use error::{UrlError, UrlResult};
pub use parts::{build, parse, UrlParts};

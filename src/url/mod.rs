//! URL handling module for Sumi-Index
//!
//! Every URL the crawler touches goes through [`normalize_url`]; the
//! normalized string is both the visited-set key and the storage key.
//! Links found on pages go through [`resolve_link`] first.

mod normalize;
mod resolve;

pub use normalize::normalize_url;
pub use resolve::resolve_link;

//! Data model for the conversion pipeline.
//!
//! These types form the contract between pipeline stages: extractors
//! produce [`RawUnit`]s and [`ImageAsset`]s, the cleanup stages turn the
//! units into a [`NormalizedDocument`], and the composer consumes both.

mod asset;
mod document;

pub use asset::{ContentKey, ImageAsset};
pub use document::{NormalizedDocument, RawUnit};

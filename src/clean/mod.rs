//! Text cleanup: boilerplate removal across units and normalization of
//! the joined paragraph stream.

mod boilerplate;
mod normalize;

pub use boilerplate::{BoilerplateDetector, BoilerplateOptions, BoilerplateSet};
pub use normalize::TextNormalizer;

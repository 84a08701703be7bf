//! Built-in similarity comparators.

mod table;

pub use table::SimilarityTable;

use concord_core::constants::EXACT_SIMILARITY;
use concord_core::models::Literal;
use concord_core::traits::SimilarityComparator;

/// `1.0` for identical literals, `0.0` otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatch;

impl SimilarityComparator for ExactMatch {
    fn similarity(&self, a: &Literal, b: &Literal) -> f64 {
        if a == b {
            EXACT_SIMILARITY
        } else {
            0.0
        }
    }
}

use std::collections::HashMap;

use concord_core::constants::EXACT_SIMILARITY;
use concord_core::models::{Literal, SimilarityEntry};
use concord_core::traits::SimilarityComparator;

/// Symmetric symbol-pair similarity.
///
/// Literals of opposite polarity never match. Equal symbols score `1.0`;
/// other pairs score their table entry, or `0.0` when absent.
#[derive(Debug, Clone, Default)]
pub struct SimilarityTable {
    pairs: HashMap<(String, String), f64>,
}

impl SimilarityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &[SimilarityEntry]) -> Self {
        let mut table = Self::new();
        for e in entries {
            table.insert(&e.left, &e.right, e.degree);
        }
        table
    }

    pub fn with(mut self, left: &str, right: &str, degree: f64) -> Self {
        self.insert(left, right, degree);
        self
    }

    pub fn insert(&mut self, left: &str, right: &str, degree: f64) {
        self.pairs.insert(ordered(left, right), degree.clamp(0.0, 1.0));
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn ordered(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl SimilarityComparator for SimilarityTable {
    fn similarity(&self, a: &Literal, b: &Literal) -> f64 {
        if a.positive != b.positive {
            return 0.0;
        }
        if a.symbol == b.symbol {
            return EXACT_SIMILARITY;
        }
        self.pairs
            .get(&ordered(&a.symbol, &b.symbol))
            .copied()
            .unwrap_or(0.0)
    }
}

use crate::models::Literal;

/// Scores how well one literal approximates another, in `[0.0, 1.0]`.
///
/// The engine only calls it and compares the result to the society's
/// acceptance threshold. Any `Fn(&Literal, &Literal) -> f64` closure
/// qualifies.
pub trait SimilarityComparator: Send + Sync {
    fn similarity(&self, a: &Literal, b: &Literal) -> f64;
}

impl<F> SimilarityComparator for F
where
    F: Fn(&Literal, &Literal) -> f64 + Send + Sync,
{
    fn similarity(&self, a: &Literal, b: &Literal) -> f64 {
        self(a, b)
    }
}

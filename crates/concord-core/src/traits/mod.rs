mod similarity;

pub use similarity::SimilarityComparator;

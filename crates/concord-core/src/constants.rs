/// Concord system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Negation marker at the start of a literal's textual form.
pub const NEGATION_MARKER: char = '¬';

/// ASCII alternative accepted when parsing negated literals.
pub const ASCII_NEGATION_MARKER: char = '~';

/// Token rendered in place of an agent id for unbound terms.
pub const UNBOUND_DISPLAY: &str = "?";

/// Similarity degree of an exact literal match.
pub const EXACT_SIMILARITY: f64 = 1.0;

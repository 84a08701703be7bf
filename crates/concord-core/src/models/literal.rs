//! Propositional literals.
//!
//! # Examples
//!
//! ```
//! use concord_core::models::Literal;
//!
//! let lit: Literal = "¬ed(m1)".parse().unwrap();
//! assert_eq!(lit.symbol, "ed(m1)");
//! assert!(!lit.positive);
//! assert_eq!(-lit, Literal::positive("ed(m1)"));
//! ```

use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{ASCII_NEGATION_MARKER, NEGATION_MARKER};
use crate::errors::SocietyError;

/// A proposition name with a polarity bit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    pub symbol: String,
    pub positive: bool,
}

impl Literal {
    pub fn new(symbol: impl Into<String>, positive: bool) -> Self {
        Self {
            symbol: symbol.into(),
            positive,
        }
    }

    pub fn positive(symbol: impl Into<String>) -> Self {
        Self::new(symbol, true)
    }

    pub fn negative(symbol: impl Into<String>) -> Self {
        Self::new(symbol, false)
    }

    /// Same symbol, flipped polarity.
    pub fn negated(&self) -> Self {
        Self {
            symbol: self.symbol.clone(),
            positive: !self.positive,
        }
    }

    /// Parse the textual convention: a leading `¬` (or `~`) marks a negative literal.
    pub fn parse(text: &str) -> Result<Self, SocietyError> {
        let trimmed = text.trim();
        let (positive, rest) = match trimmed
            .strip_prefix(NEGATION_MARKER)
            .or_else(|| trimmed.strip_prefix(ASCII_NEGATION_MARKER))
        {
            Some(rest) => (false, rest.trim_start()),
            None => (true, trimmed),
        };
        if rest.is_empty()
            || rest.starts_with(NEGATION_MARKER)
            || rest.starts_with(ASCII_NEGATION_MARKER)
        {
            return Err(SocietyError::InvalidLiteral(text.to_string()));
        }
        Ok(Self::new(rest, positive))
    }
}

impl Neg for Literal {
    type Output = Literal;

    fn neg(self) -> Literal {
        Literal {
            symbol: self.symbol,
            positive: !self.positive,
        }
    }
}

impl Neg for &Literal {
    type Output = Literal;

    fn neg(self) -> Literal {
        self.negated()
    }
}

impl FromStr for Literal {
    type Err = SocietyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Literal::parse(s)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.positive {
            f.write_str(&self.symbol)
        } else {
            write!(f, "{NEGATION_MARKER}{}", self.symbol)
        }
    }
}

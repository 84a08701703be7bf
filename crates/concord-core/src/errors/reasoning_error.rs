/// Fatal conditions during query resolution.
///
/// Absence of evidence is never an error: it is answered with
/// `False` or `Undefined`.
#[derive(Debug, thiserror::Error)]
pub enum ReasoningError {
    #[error("recursion depth exceeded: max {max_depth}, reached {depth}")]
    RecursionLimitExceeded { depth: usize, max_depth: usize },

    #[error("agent not found: {0}")]
    UnknownAgent(String),
}

/// Errors raised while assembling a society, before any query runs.
#[derive(Debug, thiserror::Error)]
pub enum SocietyError {
    /// A rule, term, or preference referenced an agent that is not registered.
    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    /// Two agents were registered under the same id.
    #[error("agent already registered: {0}")]
    DuplicateAgent(String),

    /// A literal's textual form could not be parsed.
    #[error("invalid literal: {0:?}")]
    InvalidLiteral(String),

    /// Static rules of one agent depend on each other in a loop.
    #[error("static rule cycle in agent {agent}: {path}")]
    StaticCycle { agent: String, path: String },

    /// A preference weight fell outside [0.0, 1.0].
    #[error("invalid preference {value} from agent {agent} toward {target}")]
    InvalidPreference {
        agent: String,
        target: String,
        value: f64,
    },

    /// The similarity threshold fell outside [0.0, 1.0].
    #[error("invalid similarity threshold: {0}")]
    InvalidThreshold(f64),
}

use thiserror::Error;

/// Errors raised while building or querying automata.
///
/// Once an automaton exists it is a valid, deterministic value; only counting
/// can fail afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    /// A second transition for an existing (state, symbol) key pointed elsewhere.
    #[error(
        "determinism violation at state {state} on symbol {symbol}: \
         already leads to {existing}, refusing {attempted}"
    )]
    DeterminismViolation {
        state: String,
        symbol: String,
        existing: String,
        attempted: String,
    },

    /// The defining data handed to a generator is inconsistent.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The operands of an unambiguous concatenation do not satisfy its preconditions.
    #[error("concatenation precondition violated: {0}")]
    PreconditionViolation(String),

    /// A composition produced an automaton without final states.
    #[error("the resulting automaton accepts no words")]
    EmptyLanguage,

    #[error("state {0} is not in this automaton")]
    UnknownState(String),

    /// A word count no longer fits in a `u64`.
    #[error("word count overflows u64 at length {length}")]
    CountOverflow { length: usize },
}

pub type Result<T> = std::result::Result<T, AutomatonError>;

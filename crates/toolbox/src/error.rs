use thiserror::Error;

/// Failures while evaluating an arithmetic expression.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CalcError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),

    #[error("name '{0}' is not defined")]
    UnknownName(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("{name}() expects {expected}, got {got}")]
    Arity {
        name: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("math domain error")]
    Domain,

    #[error("result out of range")]
    Overflow,

    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),
}

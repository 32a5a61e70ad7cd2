//! Error type for expression evaluation.

use thiserror::Error;

/// Error raised when an expression fails to evaluate against a context.
///
/// Raised both for syntax errors in the expression itself and for binding
/// errors such as referencing a header or property absent from the context.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The expression failed to parse or render.
    #[error("Expression '{expr}' failed to evaluate: {reason}")]
    Render {
        /// The expression source text
        expr: String,
        /// Why evaluation failed
        reason: String,
    },
}

impl EvalError {
    /// Creates a render error for the given expression.
    pub fn render(expr: impl Into<String>, reason: impl ToString) -> Self {
        Self::Render {
            expr: expr.into(),
            reason: reason.to_string(),
        }
    }
}

//! Expression evaluation layer.
//!
//! This module provides:
//! - The pluggable evaluator seam ([`Evaluator`])
//! - Production template-based implementation ([`TemplateEvaluator`])
//! - Context adapters exposing messages and responses to expressions
//!   ([`message_context`], [`response_context`])
//! - Evaluation errors ([`EvalError`])
//!
//! Expressions are evaluated against one of two read-only contexts: the
//! message context (`payload`, `headers`, `env`) or the response context
//! (`status`, `headers`, `body`). The evaluator never mutates either.

mod context;
mod error;
mod evaluator;


pub use context::{message_context, response_context};
pub use error::EvalError;
pub use evaluator::{Evaluator, TemplateEvaluator};

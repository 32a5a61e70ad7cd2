//! Expression evaluator trait and template-based implementation.

use handlebars::{Handlebars, handlebars_helper};

use super::EvalError;

/// Trait for evaluating a configured expression against a context.
///
/// The expression language is a pluggable capability: the processor core
/// only requires "evaluate expression E against context C, yield a string".
/// The production implementation is [`TemplateEvaluator`]; tests or
/// embedders may substitute anything that satisfies this contract.
pub trait Evaluator: Send + Sync {
    /// Evaluates `expr` against `context` and returns the rendered value.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] if the expression is malformed or references
    /// a field absent from the context.
    fn evaluate(&self, expr: &str, context: &serde_json::Value) -> Result<String, EvalError>;
}

// Character-based slice of the input, so expressions like
// `{{substr body 3 8}}` mirror `substring(3, 8)` semantics.
handlebars_helper!(substr: |s: str, start: u64, end: u64| {
    let start = usize::try_from(start).unwrap_or(usize::MAX);
    let end = usize::try_from(end).unwrap_or(usize::MAX);
    if end <= start {
        String::new()
    } else {
        s.chars().skip(start).take(end - start).collect::<String>()
    }
});

/// Production evaluator using Handlebars templates.
///
/// Runs in strict mode: referencing a missing `payload`, `headers.*`, or
/// `env.*` field is an evaluation error rather than an empty substitution,
/// so configuration mistakes surface per message instead of producing
/// malformed requests.
///
/// # Helpers
///
/// - `substr`: `{{substr body 3 8}}` yields characters 3..8 of the body.
/// - `lookup` (built-in): `{{lookup headers "content-type"}}` reads header
///   names that are not valid Handlebars identifiers.
///
/// # Example
///
/// ```
/// use http_relay::expr::{Evaluator, TemplateEvaluator};
/// use serde_json::json;
///
/// let evaluator = TemplateEvaluator::new();
/// let context = json!({ "payload": "greet", "env": { "port": "8080" } });
/// let url = evaluator
///     .evaluate("http://localhost:{{env.port}}/{{payload}}", &context)
///     .unwrap();
/// assert_eq!(url, "http://localhost:8080/greet");
/// ```
#[derive(Debug)]
pub struct TemplateEvaluator {
    registry: Handlebars<'static>,
}

impl TemplateEvaluator {
    /// Creates an evaluator with strict mode and the `substr` helper.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_helper("substr", Box::new(substr));
        Self { registry }
    }

    /// Checks that an expression is syntactically valid.
    ///
    /// Used by configuration validation to reject bad expressions at load
    /// time rather than on the first message. Binding errors (missing
    /// fields) can only surface at evaluation time.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] if the expression cannot be parsed.
    pub fn check_syntax(&self, expr: &str) -> Result<(), EvalError> {
        handlebars::Template::compile(expr)
            .map(|_| ())
            .map_err(|e| EvalError::render(expr, e))
    }
}

impl Default for TemplateEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for TemplateEvaluator {
    fn evaluate(&self, expr: &str, context: &serde_json::Value) -> Result<String, EvalError> {
        self.registry
            .render_template(expr, context)
            .map_err(|e| EvalError::render(expr, e))
    }
}

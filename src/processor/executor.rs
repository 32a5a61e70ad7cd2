//! Request executor: orchestrates one inbound message end to end.

use super::builder::RequestBuilder;
use super::error::ProcessError;
use super::message::{InboundMessage, OutboundMessage};
use super::reply::ReplyExtractor;
use super::retry::execute_with_retry;
use super::{ProcessorConfig, RetryPolicy};
use crate::expr::{Evaluator, TemplateEvaluator};
use crate::http::HttpClient;
use crate::time::{Sleeper, TokioSleeper};

/// Processes inbound messages into outbound messages via HTTP.
///
/// For each message: build the request from the configured expressions,
/// execute it under the retry policy, decode the response, extract the
/// reply. The configuration is read-only, so a single `Processor` can serve
/// concurrent messages; each message's processing is strictly sequential
/// internally and shares no state with others.
///
/// # Type parameters
///
/// - `H`: HTTP client implementation
/// - `E`: expression evaluator (defaults to [`TemplateEvaluator`])
/// - `S`: sleeper for retry delays (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```no_run
/// use http_relay::http::ReqwestClient;
/// use http_relay::processor::{InboundMessage, Processor, ProcessorConfig};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ProcessorConfig::new().with_url(Url::parse("http://localhost:8080/greet")?);
/// let processor = Processor::new(ReqwestClient::new(), config);
///
/// let reply = processor.process(&InboundMessage::text("hello")).await?;
/// println!("{}", reply.payload);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Processor<H, E = TemplateEvaluator, S = TokioSleeper> {
    client: H,
    evaluator: E,
    sleeper: S,
    config: ProcessorConfig,
}

impl<H> Processor<H> {
    /// Creates a processor with the production evaluator and sleeper.
    #[must_use]
    pub fn new(client: H, config: ProcessorConfig) -> Self {
        Self {
            client,
            evaluator: TemplateEvaluator::new(),
            sleeper: TokioSleeper,
            config,
        }
    }
}

impl<H, E, S> Processor<H, E, S> {
    /// Substitutes the expression evaluator.
    #[must_use]
    pub fn with_evaluator<E2>(self, evaluator: E2) -> Processor<H, E2, S> {
        Processor {
            client: self.client,
            evaluator,
            sleeper: self.sleeper,
            config: self.config,
        }
    }

    /// Substitutes the sleeper used for retry delays.
    ///
    /// Primarily useful for testing the retry loop without real delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> Processor<H, E, S2> {
        Processor {
            client: self.client,
            evaluator: self.evaluator,
            sleeper,
            config: self.config,
        }
    }

    /// Returns the processor configuration.
    #[must_use]
    pub const fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Returns the configured retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.config.retry
    }
}

impl<H: HttpClient, E: Evaluator, S: Sleeper> Processor<H, E, S> {
    /// Processes one inbound message end to end.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError`] on any terminal failure: request resolution,
    /// a non-retryable transport failure, an exhausted retry budget, or
    /// reply extraction. No partial output is emitted on failure.
    pub async fn process(&self, message: &InboundMessage) -> Result<OutboundMessage, ProcessError> {
        let request = RequestBuilder::new(&self.config, &self.evaluator).build(message)?;
        tracing::debug!(method = %request.method, url = %request.url, "resolved request");

        let response =
            execute_with_retry(&self.client, &self.sleeper, &self.config.retry, &request).await?;

        let envelope = self.config.response_type.decode(response)?;
        let payload = ReplyExtractor::new(&self.config, &self.evaluator).extract(&envelope)?;

        Ok(OutboundMessage::new(payload))
    }
}

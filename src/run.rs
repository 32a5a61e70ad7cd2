//! Application execution logic.
//!
//! The host "channel" for the relay: newline-delimited payloads arrive on
//! stdin, each is processed through the relay core, and reply payloads are
//! written to stdout. Failures are logged and the next message proceeds;
//! the channel decides nothing about retries.

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio_stream::{StreamExt, wrappers::LinesStream};

use http_relay::config::ValidatedConfig;
use http_relay::expr::Evaluator;
use http_relay::http::{HttpClient, ReqwestClient};
use http_relay::processor::{InboundMessage, Processor};
use http_relay::time::Sleeper;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Reading from the input stream failed.
    #[error("Failed to read input: {0}")]
    Input(#[source] std::io::Error),
}

/// Executes the main relay loop until stdin closes or a shutdown signal
/// arrives.
///
/// # Errors
///
/// Returns an error if reading from stdin fails.
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let processor = Processor::new(ReqwestClient::new(), config.processor);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = LinesStream::new(stdin.lines());

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping...");
                return Ok(());
            }

            line = lines.next() => {
                match line {
                    Some(Ok(payload)) => handle_message(&processor, payload).await,
                    Some(Err(e)) => return Err(RunError::Input(e)),
                    None => {
                        tracing::info!("Input closed, stopping...");
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Processes one payload line and emits the reply, logging failures.
async fn handle_message<H, E, S>(processor: &Processor<H, E, S>, payload: String)
where
    H: HttpClient,
    E: Evaluator,
    S: Sleeper,
{
    let message = InboundMessage::text(payload);

    match processor.process(&message).await {
        Ok(reply) => println!("{}", reply.payload),
        Err(e) => tracing::error!("Message processing failed: {e}"),
    }
}

/// Returns a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

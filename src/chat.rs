//! Interactive terminal client

use crate::config::ClientConfig;
use crate::render::{RenderSink, TerminalSink};
use crate::runtime::{start_session, SessionError};
use crate::transport::{ChatTransport, HttpTransport, LoggingTransport, TransportError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const QUIT_COMMAND: &str = "/quit";

/// Run a session against the configured backend, reading lines from stdin
pub async fn run(config: &ClientConfig) -> Result<(), TransportError> {
    let transport = LoggingTransport::new(HttpTransport::new(&config.endpoint, config.timeout)?);
    let sink = TerminalSink::stdout(config.use_color);

    println!("{}", banner(&config.endpoint));
    drive(BufReader::new(tokio::io::stdin()), transport, sink).await;
    Ok(())
}

fn banner(endpoint: &str) -> String {
    format!("Sending messages to {endpoint}. Type {QUIT_COMMAND} to leave.")
}

/// Feed each input line to a fresh session until EOF or the quit command
async fn drive<I, T, R>(input: I, transport: T, sink: R)
where
    I: AsyncBufRead + Unpin,
    T: ChatTransport + 'static,
    R: RenderSink + 'static,
{
    let (handle, task) = start_session(transport, sink);
    let mut lines = input.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read input");
                break;
            }
        };

        if line.trim() == QUIT_COMMAND {
            break;
        }

        match handle.submit(line).await {
            Ok(()) => {}
            Err(SessionError::Rejected(reason)) => {
                tracing::debug!(session_id = %handle.session_id(), reason = %reason, "Input ignored");
            }
            Err(SessionError::Closed) => break,
        }
    }

    if let Ok(snapshot) = handle.snapshot().await {
        tracing::info!(
            session_id = %handle.session_id(),
            status = ?snapshot.status,
            turns = snapshot.history.len(),
            "Leaving session"
        );
    }
    handle.shutdown().await;
    if let Err(e) = task.await {
        tracing::error!(error = %e, "Session task failed");
    }
}

//! Interactive and batch command loops on top of a [Session].

use log::{debug, error};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::{error::RconError, session::Session};

/// Lines that end an interactive session.
pub const EXIT_COMMANDS: [&str; 2] = ["exit", "quit"];

const PROMPT: &[u8] = b"> ";

/// How responses are printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOptions {
    /// Don't print responses or the interactive prompt.
    pub quiet: bool,
    /// Prefix each response with its packet id.
    pub show_id: bool,
}

/// Read commands from `input` one line at a time until an exit command or end
/// of input, printing each response to `output`.
///
/// Errors are logged and the loop goes on as long as the session is still
/// usable. Once it isn't, the error that broke it is returned.
pub async fn run_interactive<S, R, W>(
    session: &mut Session<S>,
    input: R,
    output: &mut W,
    options: ConsoleOptions,
) -> Result<(), RconError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    loop {
        if !options.quiet {
            output
                .write_all(PROMPT)
                .await
                .map_err(RconError::ConsoleError)?;
            output.flush().await.map_err(RconError::ConsoleError)?;
        }

        let line = match lines.next_line().await.map_err(RconError::ConsoleError)? {
            Some(line) => line,
            None => break,
        };
        let command = line.trim();

        if command.is_empty() {
            continue;
        }
        if EXIT_COMMANDS.contains(&command) {
            debug!("exit requested");
            break;
        }

        match execute(session, command, output, options).await {
            Ok(()) => {}
            Err(e) if session.is_usable() => error!("{}", e),
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

/// Run every command in order. The first error stops the batch.
pub async fn run_batch<S, W, I, C>(
    session: &mut Session<S>,
    commands: I,
    output: &mut W,
    options: ConsoleOptions,
) -> Result<(), RconError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    W: AsyncWrite + Unpin,
    I: IntoIterator<Item = C>,
    C: AsRef<str>,
{
    for command in commands {
        execute(session, command.as_ref(), output, options).await?;
    }
    Ok(())
}

async fn execute<S, W>(
    session: &mut Session<S>,
    command: &str,
    output: &mut W,
    options: ConsoleOptions,
) -> Result<(), RconError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    W: AsyncWrite + Unpin,
{
    let response = session.command(command).await?;
    if options.quiet {
        return Ok(());
    }

    let mut text = response.printable(options.show_id);
    if !text.ends_with('\n') {
        text.push('\n');
    }
    output
        .write_all(text.as_bytes())
        .await
        .map_err(RconError::ConsoleError)?;
    output.flush().await.map_err(RconError::ConsoleError)
}

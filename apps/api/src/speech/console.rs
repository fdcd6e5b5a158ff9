//! Text-mode `SpeechIo` over stdin/stdout, for running an interview in a terminal.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};

use crate::speech::SpeechIo;

pub struct ConsoleIo<R, W> {
    lines: Lines<BufReader<R>>,
    out: W,
}

impl ConsoleIo<tokio::io::Stdin, tokio::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> ConsoleIo<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, out: W) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            out,
        }
    }
}

#[async_trait]
impl<R, W> SpeechIo for ConsoleIo<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn say(&mut self, text: &str) -> anyhow::Result<()> {
        self.out
            .write_all(format!("Interviewer: {text}\n").as_bytes())
            .await
            .context("Failed to write to console")?;
        self.out.flush().await.context("Failed to flush console")?;
        Ok(())
    }

    /// End of input is reported as a timeout so the driver can wind down.
    async fn listen(&mut self, timeout: Duration) -> anyhow::Result<Option<String>> {
        self.out
            .write_all(b"You: ")
            .await
            .context("Failed to write to console")?;
        self.out.flush().await.context("Failed to flush console")?;

        match tokio::time::timeout(timeout, self.lines.next_line()).await {
            Ok(line) => Ok(line.context("Failed to read from console")?),
            Err(_) => {
                self.out
                    .write_all(b"\n")
                    .await
                    .context("Failed to write to console")?;
                Ok(None)
            }
        }
    }
}

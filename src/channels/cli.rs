//! Stdin/stdout terminal for local use.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};

use super::Terminal;

/// Reads lines from stdin and writes to stdout. Logs go to stderr.
pub struct StdioTerminal {
    lines: Lines<BufReader<Stdin>>,
    stdout: Stdout,
}

impl StdioTerminal {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            stdout: tokio::io::stdout(),
        }
    }
}

impl Default for StdioTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Terminal for StdioTerminal {
    async fn read_line(&mut self) -> std::io::Result<Option<String>> {
        self.stdout.write_all(b"> ").await?;
        self.stdout.flush().await?;
        match self.lines.next_line().await? {
            Some(line) => Ok(Some(line.trim_end_matches('\r').to_string())),
            None => Ok(None), // EOF
        }
    }

    async fn print(&mut self, text: &str) -> std::io::Result<()> {
        self.stdout.write_all(text.as_bytes()).await?;
        self.stdout.write_all(b"\n").await?;
        self.stdout.flush().await
    }
}

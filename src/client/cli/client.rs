use super::io::Console;
use crate::client::{Agent, ChatTransport};

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::info;

const EXIT_COMMANDS: [&str; 2] = ["exit", "quit"];

pub fn is_exit_command(input: &str) -> bool {
    EXIT_COMMANDS
        .iter()
        .any(|command| input.trim().eq_ignore_ascii_case(command))
}

pub struct CliClient<T, C: Send + Sync + 'static, R, W> {
    agent: Agent<T, C>,
    console: Console<R, W>,
}

impl<T, C, R, W> CliClient<T, C, R, W>
where
    T: ChatTransport,
    C: Send + Sync + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(agent: Agent<T, C>, console: Console<R, W>) -> Self {
        Self { agent, console }
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Question, answer, repeat. Failed turns are printed like answers; only
    /// losing the console ends the loop with an error.
    pub async fn chat(&mut self) -> Result<()> {
        self.console.print_banner().await?;
        while let Some(user_input) = self.console.read_user_input().await? {
            if user_input.is_empty() {
                continue;
            }
            if is_exit_command(&user_input) {
                break;
            }
            let answer = self.agent.answer(&user_input).await;
            self.console.print_answer(&answer).await?;
        }
        info!("chat ended");
        Ok(())
    }
}

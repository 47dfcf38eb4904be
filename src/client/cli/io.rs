use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};

const RESET: &str = "\x1B[0m";
const DIM: &str = "\x1B[2m";
const USER: &str = "\x1B[32m";
const ASSISTANT: &str = "\x1B[35m";

/// ANSI styling for the prompt and answers; every style is empty when off.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn paint(&self, code: &'static str) -> &'static str {
        if self.enabled { code } else { "" }
    }

    fn reset(&self) -> &'static str {
        self.paint(RESET)
    }
}

pub struct Console<R, W> {
    reader: R,
    writer: W,
    palette: Palette,
}

impl Console<BufReader<Stdin>, Stdout> {
    pub fn stdio(color: bool) -> Self {
        Console::new(
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            Palette::new(color),
        )
    }
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W, palette: Palette) -> Self {
        Self {
            reader,
            writer,
            palette,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    pub async fn print_banner(&mut self) -> Result<()> {
        let banner = format!(
            "{}Local chat (stateless) - type 'exit' to quit{}\n\n",
            self.palette.paint(DIM),
            self.palette.reset()
        );
        self.write(&banner).await
    }

    /// Prompts and reads one line; `None` once input is exhausted.
    pub async fn read_user_input(&mut self) -> Result<Option<String>> {
        let prompt = format!("{}You:{} ", self.palette.paint(USER), self.palette.reset());
        self.write(&prompt).await?;
        let mut buffer = String::new();
        if self.reader.read_line(&mut buffer).await? == 0 {
            self.write("\n").await?;
            return Ok(None);
        }
        Ok(Some(buffer.trim().to_string()))
    }

    pub async fn print_answer(&mut self, answer: &str) -> Result<()> {
        let answer = if answer.is_empty() {
            "(the model returned an empty answer)"
        } else {
            answer
        };
        let line = format!(
            "{}Assistant:{} {}\n\n",
            self.palette.paint(ASSISTANT),
            self.palette.reset(),
            answer
        );
        self.write(&line).await
    }

    async fn write(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

//! Interactive prompt abstraction — line input and single-choice selection.
//!
//! The core logic only depends on the [`Prompt`] trait, so any prompt toolkit
//! (or a scripted test double) can stand in for the terminal. The bundled
//! implementation is a plain line-oriented reader over stdin/stdout.

use std::io::{BufRead, Write};

use crate::error::{Error, Result};

/// Interactive input capability used by the collector, menu, and extractor.
pub trait Prompt {
    /// Ask for one line of text. Returns the line without its trailing
    /// newline; end of input yields an empty string.
    fn read_line(&mut self, message: &str) -> Result<String>;

    /// Ask the user to pick one of `options`. Returns the selected index, or
    /// `None` if the prompt was cancelled (end of input or an empty answer).
    fn choose(&mut self, message: &str, options: &[String]) -> Result<Option<usize>>;

    /// Show one line of output to the user.
    fn say(&mut self, message: &str) -> Result<()>;

    /// Yes/no confirmation built on [`choose`](Prompt::choose); defaults to
    /// "No" on cancellation.
    fn confirm(&mut self, message: &str) -> Result<bool> {
        let options = ["Yes".to_string(), "No".to_string()];
        Ok(self.choose(message, &options)? == Some(0))
    }
}

/// Line-oriented [`Prompt`] over any reader/writer pair.
///
/// Selections are presented as a numbered list; the user answers with the
/// 1-based number. Out-of-range or non-numeric answers re-prompt, an empty
/// answer cancels.
pub struct LinePrompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    /// Wrap a reader/writer pair
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Consume the prompt, returning the underlying writer
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn next_line(&mut self) -> Result<String> {
        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|e| Error::Prompt(format!("failed to read input: {e}")))?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn write_message(&mut self, message: &str) -> Result<()> {
        write!(self.writer, "{message} ")
            .and_then(|()| self.writer.flush())
            .map_err(|e| Error::Prompt(format!("failed to write prompt: {e}")))
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn read_line(&mut self, message: &str) -> Result<String> {
        self.write_message(message)?;
        self.next_line()
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{message}")
            .map_err(|e| Error::Prompt(format!("failed to write output: {e}")))
    }

    fn choose(&mut self, message: &str, options: &[String]) -> Result<Option<usize>> {
        loop {
            writeln!(self.writer, "{message}")
                .map_err(|e| Error::Prompt(format!("failed to write prompt: {e}")))?;
            for (i, option) in options.iter().enumerate() {
                writeln!(self.writer, "  {}) {option}", i + 1)
                    .map_err(|e| Error::Prompt(format!("failed to write prompt: {e}")))?;
            }
            self.write_message("Select:")?;

            let answer = self.next_line()?;
            if answer.trim().is_empty() {
                return Ok(None);
            }
            match answer.trim().parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => {
                    writeln!(
                        self.writer,
                        "Please answer with a number between 1 and {}.",
                        options.len()
                    )
                    .map_err(|e| Error::Prompt(format!("failed to write prompt: {e}")))?;
                }
            }
        }
    }
}

/// [`LinePrompt`] bound to the process terminal
pub type StdinPrompt = LinePrompt<std::io::StdinLock<'static>, std::io::Stdout>;

impl StdinPrompt {
    /// Prompt over the process stdin/stdout
    pub fn stdin() -> Self {
        LinePrompt::new(std::io::stdin().lock(), std::io::stdout())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompt(input: &str) -> LinePrompt<Cursor<Vec<u8>>, Vec<u8>> {
        LinePrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn read_line_strips_newline() {
        let mut p = prompt("hello world\n");
        assert_eq!(p.read_line("Say something:").unwrap(), "hello world");
    }

    #[test]
    fn read_line_at_eof_yields_empty_string() {
        let mut p = prompt("");
        assert_eq!(p.read_line("Anything:").unwrap(), "");
    }

    #[test]
    fn choose_returns_zero_based_index() {
        let mut p = prompt("2\n");
        let options = vec!["first".to_string(), "second".to_string()];
        assert_eq!(p.choose("Pick:", &options).unwrap(), Some(1));
    }

    #[test]
    fn choose_empty_answer_cancels() {
        let mut p = prompt("\n");
        let options = vec!["only".to_string()];
        assert_eq!(p.choose("Pick:", &options).unwrap(), None);
    }

    #[test]
    fn choose_reprompts_on_invalid_answer() {
        // "5" is out of range, "x" is not a number; "1" finally lands
        let mut p = prompt("5\nx\n1\n");
        let options = vec!["first".to_string(), "second".to_string()];
        assert_eq!(p.choose("Pick:", &options).unwrap(), Some(0));
        let shown = String::from_utf8(p.into_writer()).unwrap();
        assert!(shown.contains("between 1 and 2"));
    }

    #[test]
    fn confirm_maps_yes_to_true_and_cancel_to_false() {
        let mut yes = prompt("1\n");
        assert!(yes.confirm("Delete?").unwrap());

        let mut no = prompt("2\n");
        assert!(!no.confirm("Delete?").unwrap());

        let mut cancelled = prompt("\n");
        assert!(!cancelled.confirm("Delete?").unwrap());
    }

    #[test]
    fn choose_renders_numbered_options() {
        let mut p = prompt("1\n");
        let options = vec!["Fetch".to_string(), "Parse".to_string()];
        p.choose("What now?", &options).unwrap();
        let shown = String::from_utf8(p.into_writer()).unwrap();
        assert!(shown.contains("1) Fetch"));
        assert!(shown.contains("2) Parse"));
    }
}

//! Interactive prompts.

use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::Input;

use crate::error::Result;

/// Source of the answers a session needs.
pub trait Prompter {
    /// Shows `prompt` and returns the line the user typed.
    fn input(&mut self, prompt: &str) -> Result<String>;
}

/// Reads answers from the terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&mut self, prompt: &str) -> Result<String> {
        let answer = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }
}

/// Reads one answer per line, for input piped in (`echo yes | usercleanup <id>`).
///
/// End of input reads as an empty answer.
#[derive(Debug)]
pub struct LinePrompter<R> {
    reader: R,
}

impl<R: BufRead> LinePrompter<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Prompter for LinePrompter<R> {
    fn input(&mut self, prompt: &str) -> Result<String> {
        anstream::print!("{prompt}: ");
        io::stdout().flush()?;

        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Picks the terminal prompter when stdin is a TTY, the line prompter otherwise.
pub fn stdin_prompter() -> Box<dyn Prompter> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        Box::new(TerminalPrompter)
    } else {
        Box::new(LinePrompter::new(stdin.lock()))
    }
}

/// Whether a confirmation answer allows the deletion to go ahead.
///
/// Only `yes` counts, ignoring surrounding whitespace and case.
pub fn is_confirmed(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

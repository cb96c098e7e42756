//! Interactive console prompts with a bounded number of attempts.
//!
//! Input is re-read after an invalid answer until `max_attempts` answers
//! have been rejected. A closed input stream ends the prompt with an error
//! instead of looping.

use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};

use crate::config::Ordinal;
use crate::error::{Error, Result};

pub struct Prompter<R, W> {
    input: R,
    output: W,
    max_attempts: u32,
}

impl Prompter<StdinLock<'static>, Stdout> {
    /// Prompter bound to the process console.
    pub fn stdio(max_attempts: u32) -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout(), max_attempts)
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W, max_attempts: u32) -> Self {
        Self {
            input,
            output,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Consume the prompter and return what was written to the console.
    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message)
            .and_then(|_| self.output.flush())
            .map_err(|e| Error::internal_io(e.to_string(), Some("write prompt".to_string())))
    }

    /// Next input line without its line terminator, or `None` at end of input.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| Error::internal_io(e.to_string(), Some("read input".to_string())))?;

        if read == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\n', '\r']).to_string();
        Ok(Some(trimmed))
    }

    /// Ask `question` once, then re-read until `parse` accepts an answer.
    pub fn ask<T, F>(&mut self, question: &str, parse: F) -> Result<T>
    where
        F: Fn(&str) -> Option<T>,
    {
        self.say(question)?;
        self.read_until_valid(question, false, parse)
    }

    /// Ask for one of the numbered choices of an ordinal enum.
    ///
    /// The menu is shown again before every attempt.
    pub fn choose<T: Ordinal>(&mut self, question: &str) -> Result<T> {
        let full_question = format!("{}\n{}", question, T::menu());
        self.say(&full_question)?;
        self.read_until_valid(&full_question, true, |answer| {
            answer.parse::<i64>().ok().and_then(T::from_ordinal)
        })
    }

    fn read_until_valid<T, F>(&mut self, question: &str, repeat_question: bool, parse: F) -> Result<T>
    where
        F: Fn(&str) -> Option<T>,
    {
        for attempt in 1..=self.max_attempts {
            let Some(answer) = self.read_line()? else {
                return Err(Error::prompt_input_closed(question));
            };

            if let Some(value) = parse(answer.trim()) {
                return Ok(value);
            }

            if attempt < self.max_attempts {
                self.say(&format!("'{}' is not a valid answer.", answer.trim()))?;
                if repeat_question {
                    self.say(question)?;
                }
            }
        }

        Err(Error::prompt_attempts_exhausted(question, self.max_attempts))
    }

    /// Read lines until a blank line or end of input.
    pub fn read_multiline(&mut self, question: &str) -> Result<Vec<String>> {
        self.say(question)?;

        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            if line.is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(lines)
    }
}

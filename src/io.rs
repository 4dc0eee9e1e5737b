use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Console pairs the line-oriented input the shell reads from with the output it writes to.
pub(crate) struct Console<R: BufRead, O: Write> {
    input: R,
    output: O,
}

impl<R: BufRead, O: Write> Console<R, O> {
    pub(crate) fn new(input: R, output: O) -> Self {
        Self { input, output }
    }

    pub(crate) fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Prints `message` without a newline and reads the answer, trimmed.
    /// Returns `None` once input is exhausted.
    pub(crate) fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Ok(None);
        }
        Ok(Some(answer.trim().to_string()))
    }

    pub(crate) fn into_output(self) -> O {
        self.output
    }
}

/// Parses a user supplied amount. A leading `$` is accepted.
pub(crate) fn parse_amount(input: &str) -> Result<Decimal> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    Decimal::from_str(digits).map_err(|_| Error::InvalidNumericInput(trimmed.to_string()))
}

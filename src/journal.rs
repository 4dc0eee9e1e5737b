use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::money::Money;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const LEVEL: &str = "INFO";

/// Journal is the append-only transaction log. One line per financial event, flushed as it
/// is written.
pub struct Journal<W: Write> {
    inner: BufWriter<W>,
}

impl Journal<File> {
    /// Opens `path` for appending, creating it if it does not exist.
    pub(crate) fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        log::debug!("journal opened at {}", path.as_ref().display());
        Ok(Self::new(file))
    }
}

impl<W: Write> Journal<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self {
            inner: BufWriter::new(writer),
        }
    }

    /// Records an action against a single account, with the balance after it.
    pub(crate) fn entry(
        &mut self,
        number: &str,
        holder: &str,
        action: &str,
        balance: Money,
    ) -> Result<()> {
        self.line(&format!(
            "{} ({}) - {} → Balance: {}",
            number, holder, action, balance
        ))
    }

    /// Records a completed transfer between two accounts.
    pub(crate) fn transfer(&mut self, amount: Money, from: &str, to: &str) -> Result<()> {
        self.line(&format!("Transfer: {} from {} → {}", amount, from, to))
    }

    pub(crate) fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flushes buffered lines and hands back the underlying writer.
    pub(crate) fn finish(self) -> Result<W> {
        self.inner
            .into_inner()
            .map_err(|e| Error::Io(e.error().to_string()))
    }

    fn line(&mut self, message: &str) -> Result<()> {
        writeln!(
            self.inner,
            "{} - {} - {}",
            Local::now().format(TIMESTAMP_FORMAT),
            LEVEL,
            message
        )?;
        self.inner.flush()?;
        Ok(())
    }
}

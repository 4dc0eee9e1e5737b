use std::io::{BufRead, Write};
use std::path::Path;

use crate::bank::Bank;
use crate::error::{Error, Result};
use crate::io::{parse_amount, Console};
use crate::money::Money;

const WIDTH: usize = 60;

enum Flow {
    Continue,
    Exit,
}

/// Shell runs the interactive menu against a bank.
pub(crate) struct Shell<R: BufRead, O: Write, W: Write> {
    bank: Bank<W>,
    console: Console<R, O>,
    journal_path: String,
}

impl<R: BufRead, O: Write, W: Write> Shell<R, O, W> {
    pub(crate) fn new(bank: Bank<W>, console: Console<R, O>, journal_path: &Path) -> Self {
        Self {
            bank,
            console,
            journal_path: journal_path.display().to_string(),
        }
    }

    /// Reads and dispatches commands until the user exits or input runs out.
    ///
    /// Only I/O failures end the loop early. Every other error is reported and the menu
    /// shown again.
    pub(crate) fn run(&mut self) -> Result<()> {
        self.console.line(&rule('='))?;
        self.console
            .line(&center(" LEDGER - ACCOUNT HIERARCHY WORKSHOP ", ' '))?;
        self.console.line(&rule('='))?;

        loop {
            self.menu()?;
            let choice = match self.console.prompt("Select an option (1-7): ")? {
                Some(choice) => choice,
                None => break,
            };
            log::debug!("menu choice {:?}", choice);

            let result = match choice.as_str() {
                "1" => self.list(),
                "2" => self.deposit(),
                "3" => self.withdraw(),
                "4" => self.transfer(),
                "5" => self.monthly_batch(),
                "6" => self.compare(),
                "7" => break,
                _ => {
                    self.console.line("Invalid option. Please try again.")?;
                    Ok(Flow::Continue)
                }
            };

            match result {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(Error::Io(e)) => return Err(Error::Io(e)),
                Err(e) => {
                    log::warn!("option {} failed: {}", choice, e);
                    self.console.line(&format!("Error: {}", e))?;
                }
            }
        }

        self.farewell()
    }

    pub(crate) fn finish(self) -> (Bank<W>, O) {
        (self.bank, self.console.into_output())
    }

    fn menu(&mut self) -> Result<()> {
        self.console.line("")?;
        self.console.line(&center(" MAIN MENU ", '-'))?;
        self.console.line("1. List accounts")?;
        self.console.line("2. Deposit")?;
        self.console.line("3. Withdraw")?;
        self.console.line("4. Transfer")?;
        self.console.line("5. Run monthly batch (fees + interest)")?;
        self.console.line("6. Compare balances")?;
        self.console.line("7. Exit")?;
        self.console.line(&rule('-'))
    }

    fn list(&mut self) -> Result<Flow> {
        self.console.line("")?;
        self.console.line(&center(" CURRENT ACCOUNT STATUS ", '='))?;
        for account in self.bank.accounts() {
            self.console.line(&format!("  → {}", account))?;
            for entry in account.history() {
                self.console.line(&format!("      {}", entry))?;
            }
        }
        self.console.line(&rule('='))?;
        Ok(Flow::Continue)
    }

    fn deposit(&mut self) -> Result<Flow> {
        let Some(selector) = self.select("Account ID")? else {
            return Ok(Flow::Exit);
        };
        let Some(amount) = self.console.prompt("Amount to deposit: $")? else {
            return Ok(Flow::Exit);
        };
        let amount = parse_amount(&amount)?;
        self.bank.deposit(&selector, amount)?;
        self.console
            .line(&format!("Deposit of {} successful.", Money(amount)))?;
        Ok(Flow::Continue)
    }

    fn withdraw(&mut self) -> Result<Flow> {
        let Some(selector) = self.select("Account ID")? else {
            return Ok(Flow::Exit);
        };
        let Some(amount) = self.console.prompt("Amount to withdraw: $")? else {
            return Ok(Flow::Exit);
        };
        let amount = parse_amount(&amount)?;
        self.bank.withdraw(&selector, amount)?;
        self.console
            .line(&format!("Withdrawal of {} successful.", Money(amount)))?;
        Ok(Flow::Continue)
    }

    fn transfer(&mut self) -> Result<Flow> {
        let Some((from, to)) = self.select_pair("From", "To")? else {
            return Ok(Flow::Exit);
        };
        let question = format!(
            "How much to transfer from {} to {}? $",
            self.bank.account(&from)?.number(),
            self.bank.account(&to)?.number()
        );
        let Some(amount) = self.console.prompt(&question)? else {
            return Ok(Flow::Exit);
        };
        let amount = parse_amount(&amount)?;
        self.bank.transfer(&from, &to, amount)?;
        self.console
            .line(&format!("Transfer of {} successful.", Money(amount)))?;
        Ok(Flow::Continue)
    }

    fn monthly_batch(&mut self) -> Result<Flow> {
        self.console.line("")?;
        self.console
            .line(&center(" APPLYING MONTHLY OPERATIONS ", '*'))?;
        self.bank.run_monthly_batch()?;

        self.console.line(&rule('='))?;
        self.console
            .line(&center("MONTHLY ACCOUNT PROCESSING", ' '))?;
        self.console.line(&rule('='))?;
        for account in self.bank.accounts() {
            self.console.line(&format!("  → {}", account))?;
        }
        self.console.line(&rule('='))?;
        self.console.line(&rule('*'))?;
        Ok(Flow::Continue)
    }

    fn compare(&mut self) -> Result<Flow> {
        let Some((a, b)) = self.select_pair("Account A", "Account B")? else {
            return Ok(Flow::Exit);
        };
        let greater = self.bank.compare(&a, &b)?;
        self.console.line(&format!(
            "\nAccount {} ({}) > Account {} ({})? → {}",
            a,
            self.bank.account(&a)?.holder(),
            b,
            self.bank.account(&b)?.holder(),
            greater
        ))?;
        Ok(Flow::Continue)
    }

    fn farewell(&mut self) -> Result<()> {
        self.console.line("")?;
        self.console
            .line(&center(" THANK YOU FOR USING THE LEDGER ", '='))?;
        self.console.line(&center(
            &format!(" Transactions saved to: {} ", self.journal_path),
            ' ',
        ))?;
        self.console.line(&rule('='))?;
        self.console.line("")
    }

    /// Prompts for an account selector and checks that it names an account.
    fn select(&mut self, label: &str) -> Result<Option<String>> {
        let question = format!("{} ({}): ", label, self.bank.selectors());
        match self.console.prompt(&question)? {
            Some(selector) => {
                self.bank.account(&selector)?;
                Ok(Some(selector))
            }
            None => Ok(None),
        }
    }

    /// Reads two selectors, then checks both.
    fn select_pair(&mut self, first: &str, second: &str) -> Result<Option<(String, String)>> {
        let selectors = self.bank.selectors();
        let Some(a) = self.console.prompt(&format!("{} ({}): ", first, selectors))? else {
            return Ok(None);
        };
        let Some(b) = self.console.prompt(&format!("{} ({}): ", second, selectors))? else {
            return Ok(None);
        };
        self.bank.account(&a)?;
        self.bank.account(&b)?;
        Ok(Some((a, b)))
    }
}

fn rule(fill: char) -> String {
    std::iter::repeat(fill).take(WIDTH).collect()
}

fn center(text: &str, fill: char) -> String {
    let pad = WIDTH.saturating_sub(text.chars().count());
    let left = pad / 2;
    let mut line: String = std::iter::repeat(fill).take(left).collect();
    line.push_str(text);
    line.extend(std::iter::repeat(fill).take(pad - left));
    line
}

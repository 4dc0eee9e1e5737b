use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::io::Write;

use crate::account::{self, Account};
use crate::config::AccountSeed;
use crate::error::{Error, Result};
use crate::journal::Journal;

/// Bank owns the accounts and the journal every balance change is written to.
///
/// Accounts are addressed by their 1-based position, as shown in the menu.
pub(crate) struct Bank<W: Write> {
    accounts: Vec<Account>,
    journal: Journal<W>,
}

impl<W: Write> Bank<W> {
    pub(crate) fn new(accounts: Vec<Account>, journal: Journal<W>) -> Self {
        Self { accounts, journal }
    }

    pub(crate) fn from_seeds(seeds: &[AccountSeed], journal: Journal<W>) -> Self {
        Self::new(seeds.iter().map(AccountSeed::build).collect(), journal)
    }

    pub(crate) fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Human readable list of valid selectors, e.g. `1, 2 or 3`.
    pub(crate) fn selectors(&self) -> String {
        let keys: Vec<String> = (1..=self.accounts.len()).map(|i| i.to_string()).collect();
        match keys.split_last() {
            None => String::new(),
            Some((last, [])) => last.clone(),
            Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
        }
    }

    pub(crate) fn account(&self, selector: &str) -> Result<&Account> {
        let index = self.index(selector)?;
        Ok(&self.accounts[index])
    }

    pub(crate) fn deposit(&mut self, selector: &str, amount: Decimal) -> Result<()> {
        let index = self.index(selector)?;
        self.accounts[index].deposit(amount, &mut self.journal)
    }

    pub(crate) fn withdraw(&mut self, selector: &str, amount: Decimal) -> Result<()> {
        let index = self.index(selector)?;
        self.accounts[index].withdraw(amount, &mut self.journal)
    }

    pub(crate) fn transfer(&mut self, from: &str, to: &str, amount: Decimal) -> Result<()> {
        let source = self.index(from)?;
        let destination = self.index(to)?;
        if source == destination {
            return Err(Error::SameAccount);
        }

        let (source, destination) = if source < destination {
            let (left, right) = self.accounts.split_at_mut(destination);
            (&mut left[source], &mut right[0])
        } else {
            let (left, right) = self.accounts.split_at_mut(source);
            (&mut right[0], &mut left[destination])
        };
        account::transfer(source, destination, amount, &mut self.journal)
    }

    /// True iff the first account holds strictly more than the second.
    pub(crate) fn compare(&self, a: &str, b: &str) -> Result<bool> {
        let a = self.account(a)?;
        let b = self.account(b)?;
        Ok(account::compare_balance(a, b) == Ordering::Greater)
    }

    /// Charges fees then credits interest, account by account.
    pub(crate) fn run_monthly_batch(&mut self) -> Result<()> {
        for account in self.accounts.iter_mut() {
            let fee = account.apply_fee(&mut self.journal)?;
            let interest = account.calculate_interest(&mut self.journal)?;
            log::debug!(
                "monthly batch {}: fee {}, interest {}",
                account.number(),
                fee,
                interest
            );
        }
        self.journal.flush()
    }

    /// Flushes the journal and releases the underlying writer.
    pub(crate) fn close(self) -> Result<W> {
        self.journal.finish()
    }

    fn index(&self, selector: &str) -> Result<usize> {
        match selector.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= self.accounts.len() => Ok(n - 1),
            _ => Err(Error::InvalidAccountSelector(selector.trim().to_string())),
        }
    }
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::PathBuf;

use crate::account::{Account, AccountKind};

pub(crate) const DEFAULT_JOURNAL_PATH: &str = "transactions.log";

/// Startup settings. There is no file or flag layer; everything comes from `Default`.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) journal_path: PathBuf,
    pub(crate) seeds: Vec<AccountSeed>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            journal_path: PathBuf::from(DEFAULT_JOURNAL_PATH),
            seeds: vec![
                AccountSeed {
                    number: "001",
                    holder: "Ana Gómez",
                    balance: dec!(1020000),
                    kind: AccountKind::Savings,
                },
                AccountSeed {
                    number: "002",
                    holder: "Luis Pérez",
                    balance: dec!(-50000),
                    kind: AccountKind::checking(dec!(150000)),
                },
                AccountSeed {
                    number: "003",
                    holder: "Carlos Ruiz",
                    balance: dec!(5450000),
                    kind: AccountKind::investment(),
                },
            ],
        }
    }
}

/// An account created at startup.
#[derive(Debug, Clone)]
pub(crate) struct AccountSeed {
    pub(crate) number: &'static str,
    pub(crate) holder: &'static str,
    pub(crate) balance: Decimal,
    pub(crate) kind: AccountKind,
}

impl AccountSeed {
    pub(crate) fn build(&self) -> Account {
        Account::new(self.number, self.holder, self.balance, self.kind.clone())
    }
}

use chrono::Local;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::cmp::Ordering;
use std::fmt;
use std::io::Write;

use crate::error::{Error, Result};
use crate::journal::Journal;
use crate::money::Money;

pub(crate) const SAVINGS_ANNUAL_RATE: Decimal = dec!(0.02);
pub(crate) const DEFAULT_MONTHLY_FEE: Decimal = dec!(8000);
pub(crate) const DEFAULT_INVESTMENT_RATE: Decimal = dec!(0.085);

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// The interest and fee policy of an account.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum AccountKind {
    Savings,
    Checking {
        overdraft_limit: Decimal,
        monthly_fee: Decimal,
    },
    Investment {
        annual_rate: Decimal,
    },
}

impl AccountKind {
    pub(crate) fn checking(overdraft_limit: Decimal) -> Self {
        AccountKind::Checking {
            overdraft_limit,
            monthly_fee: DEFAULT_MONTHLY_FEE,
        }
    }

    pub(crate) fn investment() -> Self {
        AccountKind::Investment {
            annual_rate: DEFAULT_INVESTMENT_RATE,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AccountKind::Savings => "SavingsAccount",
            AccountKind::Checking { .. } => "CheckingAccount",
            AccountKind::Investment { .. } => "InvestmentAccount",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Account {
    number: String,
    holder: String,
    balance: Decimal,
    history: Vec<String>,
    kind: AccountKind,
}

impl Account {
    pub(crate) fn new(number: &str, holder: &str, balance: Decimal, kind: AccountKind) -> Self {
        Self {
            number: number.to_string(),
            holder: holder.to_string(),
            balance,
            history: Vec::new(),
            kind,
        }
    }

    pub(crate) fn number(&self) -> &str {
        &self.number
    }

    pub(crate) fn holder(&self) -> &str {
        &self.holder
    }

    pub(crate) fn balance(&self) -> Decimal {
        self.balance
    }

    pub(crate) fn history(&self) -> &[String] {
        &self.history
    }

    #[cfg(test)]
    pub(crate) fn kind(&self) -> &AccountKind {
        &self.kind
    }

    pub(crate) fn deposit<W: Write>(
        &mut self,
        amount: Decimal,
        journal: &mut Journal<W>,
    ) -> Result<()> {
        let (balance, action) = self.deposit_to(amount)?;
        self.balance = balance;
        self.record(&action, journal)
    }

    pub(crate) fn withdraw<W: Write>(
        &mut self,
        amount: Decimal,
        journal: &mut Journal<W>,
    ) -> Result<()> {
        let (balance, action) = self.withdraw_to(amount)?;
        self.balance = balance;
        self.record(&action, journal)
    }

    /// Computes this month's interest and credits it when positive.
    ///
    /// The computed value is returned even when it is not credited.
    pub(crate) fn calculate_interest<W: Write>(
        &mut self,
        journal: &mut Journal<W>,
    ) -> Result<Decimal> {
        let (rate, action) = match self.kind {
            AccountKind::Savings => (SAVINGS_ANNUAL_RATE, "Interest earned"),
            AccountKind::Investment { annual_rate } => (annual_rate, "Investment return"),
            AccountKind::Checking { .. } => return Ok(Decimal::ZERO),
        };
        let interest = self
            .balance
            .checked_mul(rate)
            .and_then(|yearly| yearly.checked_div(MONTHS_PER_YEAR))
            .ok_or(Error::Overflow)?;
        if interest > Decimal::ZERO {
            self.balance = self.balance.checked_add(interest).ok_or(Error::Overflow)?;
            self.record(&format!("{}: +{}", action, Money(interest)), journal)?;
        }
        Ok(interest)
    }

    /// Charges the monthly maintenance fee, returning the amount charged.
    pub(crate) fn apply_fee<W: Write>(&mut self, journal: &mut Journal<W>) -> Result<Decimal> {
        match self.kind {
            AccountKind::Checking { monthly_fee, .. } if self.balance > Decimal::ZERO => {
                self.balance = self
                    .balance
                    .checked_sub(monthly_fee)
                    .ok_or(Error::Overflow)?;
                let action = format!("Maintenance fee: -{}", Money(monthly_fee));
                self.record(&action, journal)?;
                Ok(monthly_fee)
            }
            _ => Ok(Decimal::ZERO),
        }
    }

    pub(crate) fn describe(&self) -> String {
        let suffix = match self.kind {
            AccountKind::Savings => {
                format!(" (Interest: {}%)", (SAVINGS_ANNUAL_RATE * dec!(100)).normalize())
            }
            AccountKind::Checking { .. } => {
                let used = (-self.balance).max(Decimal::ZERO);
                format!(" (Overdraft used: {})", Money(used))
            }
            AccountKind::Investment { annual_rate } => {
                format!(" (Return: {:.1}%)", annual_rate * dec!(100))
            }
        };
        format!(
            "{}-{}: Balance: {}{}",
            self.kind.label(),
            self.number,
            Money(self.balance),
            suffix
        )
    }

    /// Validates a deposit and returns the resulting balance with its history action.
    fn deposit_to(&self, amount: Decimal) -> Result<(Decimal, String)> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount);
        }
        let balance = self.balance.checked_add(amount).ok_or(Error::Overflow)?;
        Ok((balance, format!("Deposit: +{}", Money(amount))))
    }

    /// Validates a withdrawal and returns the resulting balance with its history action.
    fn withdraw_to(&self, amount: Decimal) -> Result<(Decimal, String)> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount);
        }
        let action = match self.kind {
            AccountKind::Checking {
                overdraft_limit, ..
            } => {
                // An overflowing sum is above any representable amount.
                if let Some(available) = self.balance.checked_add(overdraft_limit) {
                    if amount > available {
                        return Err(Error::OverdraftExceeded {
                            limit: Money(overdraft_limit),
                        });
                    }
                }
                format!("Withdrawal (overdraft allowed): -{}", Money(amount))
            }
            AccountKind::Savings | AccountKind::Investment { .. } => {
                if amount > self.balance {
                    return Err(Error::InsufficientFunds);
                }
                format!("Withdrawal: -{}", Money(amount))
            }
        };
        let balance = self.balance.checked_sub(amount).ok_or(Error::Overflow)?;
        Ok((balance, action))
    }

    fn record<W: Write>(&mut self, action: &str, journal: &mut Journal<W>) -> Result<()> {
        log::debug!("account {}: {}", self.number, action);
        self.history
            .push(format!("[{}] {}", Local::now().format("%H:%M:%S"), action));
        journal.entry(&self.number, &self.holder, action, Money(self.balance))
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Moves `amount` from `source` to `destination`.
///
/// Both sides are validated before either balance changes, and both balances change
/// before any journal line is written.
pub(crate) fn transfer<W: Write>(
    source: &mut Account,
    destination: &mut Account,
    amount: Decimal,
    journal: &mut Journal<W>,
) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount);
    }
    if source.number == destination.number {
        return Err(Error::SameAccount);
    }
    let (debited, withdrawal) = source.withdraw_to(amount)?;
    let (credited, deposit) = destination.deposit_to(amount)?;
    source.balance = debited;
    destination.balance = credited;

    source.record(&withdrawal, journal)?;
    destination.record(&deposit, journal)?;
    journal.transfer(Money(amount), &source.number, &destination.number)
}

/// Orders two accounts by balance alone.
pub(crate) fn compare_balance(a: &Account, b: &Account) -> Ordering {
    a.balance.cmp(&b.balance)
}

#[cfg(test)]
mod tests {
    use super::*;

    impl Account {
        fn savings(number: &str, holder: &str, balance: Decimal) -> Self {
            Self::new(number, holder, balance, AccountKind::Savings)
        }

        fn checking(
            number: &str,
            holder: &str,
            balance: Decimal,
            overdraft_limit: Decimal,
        ) -> Self {
            Self::new(number, holder, balance, AccountKind::checking(overdraft_limit))
        }

        fn investment(number: &str, holder: &str, balance: Decimal) -> Self {
            Self::new(number, holder, balance, AccountKind::investment())
        }
    }

    fn journal() -> Journal<Vec<u8>> {
        Journal::new(Vec::new())
    }

    fn lines(journal: Journal<Vec<u8>>) -> Vec<String> {
        String::from_utf8(journal.finish().unwrap())
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn deposit_success() {
        let mut journal = journal();
        let mut accounts = vec![
            Account::savings("001", "Ana Gómez", dec!(100)),
            Account::checking("002", "Luis Pérez", dec!(-50), dec!(150)),
            Account::investment("003", "Carlos Ruiz", dec!(0)),
        ];
        for account in accounts.iter_mut() {
            let before = account.balance();
            account.deposit(dec!(25.5), &mut journal).unwrap();
            assert_eq!(account.balance(), before + dec!(25.5));
            assert_eq!(account.history().len(), 1);
            assert!(account.history()[0].ends_with("] Deposit: +$26"));
        }
        let lines = lines(journal);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with("002 (Luis Pérez) - Deposit: +$26 → Balance: -$24"));
    }

    #[test]
    fn non_positive_amounts_fail() {
        let mut journal = journal();
        let mut accounts = vec![
            Account::savings("001", "Ana", dec!(100)),
            Account::checking("002", "Luis", dec!(100), dec!(150)),
            Account::investment("003", "Carlos", dec!(100)),
        ];
        for account in accounts.iter_mut() {
            for amount in [dec!(0), dec!(-1)] {
                assert_eq!(account.deposit(amount, &mut journal), Err(Error::InvalidAmount));
                assert_eq!(account.withdraw(amount, &mut journal), Err(Error::InvalidAmount));
            }
            assert_eq!(account.balance(), dec!(100));
            assert!(account.history().is_empty());
        }
        assert!(lines(journal).is_empty());
    }

    #[test]
    fn withdrawal_base_rule() {
        let mut journal = journal();
        let mut savings = Account::savings("001", "Ana", dec!(100));
        assert_eq!(
            savings.withdraw(dec!(100.01), &mut journal),
            Err(Error::InsufficientFunds)
        );
        assert_eq!(savings.balance(), dec!(100));

        let mut investment = Account::investment("003", "Carlos", dec!(100));
        assert_eq!(
            investment.withdraw(dec!(150), &mut journal),
            Err(Error::InsufficientFunds)
        );
        investment.withdraw(dec!(100), &mut journal).unwrap();
        assert_eq!(investment.balance(), dec!(0));
        assert_eq!(investment.history().len(), 1);
    }

    #[test]
    fn checking_overdraft_boundary() {
        let mut journal = journal();
        let mut checking = Account::checking("002", "Luis Pérez", dec!(-50000), dec!(150000));
        assert_eq!(
            checking.withdraw(dec!(100000.01), &mut journal),
            Err(Error::OverdraftExceeded {
                limit: Money(dec!(150000))
            })
        );
        assert_eq!(checking.balance(), dec!(-50000));

        checking.withdraw(dec!(100000), &mut journal).unwrap();
        assert_eq!(checking.balance(), dec!(-150000));
        assert_eq!(
            checking.withdraw(dec!(1), &mut journal),
            Err(Error::OverdraftExceeded {
                limit: Money(dec!(150000))
            })
        );
        let lines = lines(journal);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(
            "002 (Luis Pérez) - Withdrawal (overdraft allowed): -$100,000 → Balance: -$150,000"
        ));
    }

    #[test]
    fn savings_interest() {
        let mut journal = journal();
        let mut savings = Account::savings("001", "Ana Gómez", dec!(1020000));
        assert_eq!(savings.calculate_interest(&mut journal).unwrap(), dec!(1700));
        assert_eq!(savings.balance(), dec!(1021700));
        assert_eq!(savings.history().len(), 1);

        let mut empty = Account::savings("004", "Nadie", dec!(0));
        assert_eq!(empty.calculate_interest(&mut journal).unwrap(), dec!(0));
        assert_eq!(empty.balance(), dec!(0));
        assert!(empty.history().is_empty());

        let lines = lines(journal);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("Interest earned: +$1,700 → Balance: $1,021,700"));
    }

    #[test]
    fn investment_return() {
        let mut journal = journal();
        let mut investment = Account::new(
            "003",
            "Carlos Ruiz",
            dec!(1200),
            AccountKind::Investment {
                annual_rate: dec!(0.12),
            },
        );
        assert_eq!(investment.calculate_interest(&mut journal).unwrap(), dec!(12));
        assert_eq!(investment.balance(), dec!(1212));
        assert_eq!(investment.apply_fee(&mut journal).unwrap(), dec!(0));
        assert_eq!(investment.balance(), dec!(1212));
    }

    #[test]
    fn checking_earns_nothing() {
        let mut journal = journal();
        let mut checking = Account::checking("002", "Luis", dec!(10000), dec!(150000));
        assert_eq!(checking.calculate_interest(&mut journal).unwrap(), dec!(0));
        assert_eq!(checking.balance(), dec!(10000));
        assert!(checking.history().is_empty());
    }

    #[test]
    fn checking_fee() {
        let mut journal = journal();
        let mut checking = Account::checking("002", "Luis", dec!(5000), dec!(150000));
        assert_eq!(checking.apply_fee(&mut journal).unwrap(), DEFAULT_MONTHLY_FEE);
        assert_eq!(checking.balance(), dec!(-3000));
        // Balance is no longer positive.
        assert_eq!(checking.apply_fee(&mut journal).unwrap(), dec!(0));
        assert_eq!(checking.balance(), dec!(-3000));

        let mut zero = Account::checking("005", "Luis", dec!(0), dec!(150000));
        assert_eq!(zero.apply_fee(&mut journal).unwrap(), dec!(0));
        assert_eq!(zero.balance(), dec!(0));

        let mut savings = Account::savings("001", "Ana", dec!(5000));
        assert_eq!(savings.apply_fee(&mut journal).unwrap(), dec!(0));
        assert_eq!(lines(journal).len(), 1);
    }

    #[test]
    fn transfer_success() {
        let mut journal = journal();
        let mut source = Account::savings("001", "Ana", dec!(1000));
        let mut destination = Account::checking("002", "Luis", dec!(-50), dec!(150));
        transfer(&mut source, &mut destination, dec!(300), &mut journal).unwrap();
        assert_eq!(source.balance(), dec!(700));
        assert_eq!(destination.balance(), dec!(250));

        let lines = lines(journal);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("001 (Ana) - Withdrawal: -$300"));
        assert!(lines[1].contains("002 (Luis) - Deposit: +$300"));
        assert!(lines[2].ends_with("Transfer: $300 from 001 → 002"));
    }

    #[test]
    fn transfer_fail() {
        let mut journal = journal();
        let mut source = Account::savings("001", "Ana", dec!(100));
        let mut destination = Account::investment("003", "Carlos", dec!(10));
        assert_eq!(
            transfer(&mut source, &mut destination, dec!(150), &mut journal),
            Err(Error::InsufficientFunds)
        );
        assert_eq!(
            transfer(&mut source, &mut destination, dec!(0), &mut journal),
            Err(Error::InvalidAmount)
        );
        let mut twin = Account::savings("001", "Ana", dec!(100));
        assert_eq!(
            transfer(&mut source, &mut twin, dec!(10), &mut journal),
            Err(Error::SameAccount)
        );
        assert_eq!(source.balance(), dec!(100));
        assert_eq!(destination.balance(), dec!(10));
        assert!(destination.history().is_empty());
        assert!(lines(journal).is_empty());
    }

    #[test]
    fn compare_by_balance() {
        let rich = Account::investment("003", "Carlos", dec!(5450000));
        let poor = Account::checking("002", "Luis", dec!(-50000), dec!(150000));
        let same = Account::savings("001", "Ana", dec!(5450000));
        assert_eq!(compare_balance(&rich, &poor), Ordering::Greater);
        assert_eq!(compare_balance(&poor, &rich), Ordering::Less);
        assert_eq!(compare_balance(&rich, &same), Ordering::Equal);
    }

    #[test]
    fn describe() {
        assert_eq!(
            Account::savings("001", "Ana", dec!(1020000)).to_string(),
            "SavingsAccount-001: Balance: $1,020,000 (Interest: 2%)"
        );
        assert_eq!(
            Account::checking("002", "Luis", dec!(-50000), dec!(150000)).to_string(),
            "CheckingAccount-002: Balance: -$50,000 (Overdraft used: $50,000)"
        );
        assert_eq!(
            Account::checking("002", "Luis", dec!(1000), dec!(150000)).describe(),
            "CheckingAccount-002: Balance: $1,000 (Overdraft used: $0)"
        );
        assert_eq!(
            Account::investment("003", "Carlos", dec!(5450000)).describe(),
            "InvestmentAccount-003: Balance: $5,450,000 (Return: 8.5%)"
        );
    }

    #[test]
    fn overflow_is_an_error() {
        let mut journal = journal();
        let mut savings = Account::savings("001", "Ana", dec!(1020000));
        assert_eq!(
            savings.deposit(Decimal::MAX, &mut journal),
            Err(Error::Overflow)
        );
        assert_eq!(savings.balance(), dec!(1020000));
        assert!(savings.history().is_empty());

        let mut full = Account::savings("004", "Ana", Decimal::MAX);
        assert_eq!(full.calculate_interest(&mut journal), Err(Error::Overflow));
        assert_eq!(full.balance(), Decimal::MAX);

        // balance + limit is not representable, so any amount fits under it.
        let mut unlimited = Account::checking("002", "Luis", dec!(1), Decimal::MAX);
        unlimited.withdraw(Decimal::MAX, &mut journal).unwrap();
        assert_eq!(unlimited.balance(), dec!(1) - Decimal::MAX);

        let lines = lines(journal);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn transfer_overflow_leaves_both_sides() {
        let mut journal = journal();
        let mut source = Account::savings("001", "Ana", dec!(100));
        let mut destination = Account::investment("003", "Carlos", Decimal::MAX);
        assert_eq!(
            transfer(&mut source, &mut destination, dec!(10), &mut journal),
            Err(Error::Overflow)
        );
        assert_eq!(source.balance(), dec!(100));
        assert_eq!(destination.balance(), Decimal::MAX);
        assert!(source.history().is_empty());
        assert!(lines(journal).is_empty());
    }

    struct Unwritable;

    impl Write for Unwritable {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn transfer_moves_both_balances_before_journaling() {
        let mut journal = Journal::new(Unwritable);
        let mut source = Account::savings("001", "Ana", dec!(1000));
        let mut destination = Account::checking("002", "Luis", dec!(-50), dec!(150));
        assert_eq!(
            transfer(&mut source, &mut destination, dec!(300), &mut journal),
            Err(Error::Io("disk full".to_string()))
        );
        assert_eq!(source.balance(), dec!(700));
        assert_eq!(destination.balance(), dec!(250));
    }
}

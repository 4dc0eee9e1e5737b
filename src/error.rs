use thiserror::Error;

use crate::money::Money;

pub(crate) type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("amount must be positive")]
    InvalidAmount,
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("overdraft exceeded, limit: {limit}")]
    OverdraftExceeded { limit: Money },
    #[error("overflow")]
    Overflow,
    #[error("account not found: {0}")]
    InvalidAccountSelector(String),
    #[error("invalid amount: {0}")]
    InvalidNumericInput(String),
    #[error("cannot transfer to the same account")]
    SameAccount,
    #[error("io: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

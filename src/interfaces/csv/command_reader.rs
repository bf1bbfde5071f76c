use crate::domain::payment::PaymentId;
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    New,
    PreAuth,
    Authorize,
}

/// One row of a batch file: `command, payment, amount`.
///
/// `new` rows need an amount; the other commands need a payment id.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Command {
    pub command: CommandType,
    pub payment: Option<u64>,
    pub amount: Option<Decimal>,
}

impl Command {
    pub fn payment_id(&self) -> Result<PaymentId> {
        self.payment.map(PaymentId).ok_or_else(|| {
            PaymentError::ValidationError(format!("{:?} requires a payment id", self.command))
        })
    }

    pub fn amount(&self) -> Result<Decimal> {
        self.amount.ok_or_else(|| {
            PaymentError::ValidationError(format!("{:?} requires an amount", self.command))
        })
    }
}

/// Reads workflow commands from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<Command>`.
/// It handles whitespace trimming and flexible record lengths automatically.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes commands.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PaymentError::from))
    }
}

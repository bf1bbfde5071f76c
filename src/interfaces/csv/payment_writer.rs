use crate::domain::payment::Payment;
use crate::error::Result;
use std::io::Write;

/// Writes payments as `id,state,amount` CSV rows.
pub struct PaymentWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PaymentWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_payments(&mut self, payments: impl IntoIterator<Item = Payment>) -> Result<()> {
        for payment in payments {
            self.writer.serialize(payment)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::{Amount, PaymentId, PaymentState};
    use rust_decimal_macros::dec;

    #[test]
    fn test_write_payments() {
        let mut first = Payment::new(PaymentId(1), Amount::new(dec!(12.99)).unwrap());
        first.state = PaymentState::PreAuthError;
        let second = Payment::new(PaymentId(2), Amount::new(dec!(3)).unwrap());

        let mut out = Vec::new();
        PaymentWriter::new(&mut out)
            .write_payments(vec![first, second])
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "id,state,amount\n1,PRE_AUTH_ERROR,12.99\n2,NEW,3\n");
    }
}

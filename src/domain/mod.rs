//! Domain layer: the payment record, its workflow vocabulary and the ports
//! through which the workflow reaches storage and the card processor.

pub mod payment;
pub mod ports;

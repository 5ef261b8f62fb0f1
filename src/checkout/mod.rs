//! Plot checkout: fee breakdown, simulated payment and session hand-off.

pub mod fees;
pub mod flow;

pub use fees::compute_fees;
pub use flow::{Checkout, CheckoutError, CheckoutResult, PaymentState, Receipt};

pub mod cart;

pub use cart::{
    CartLine, CheckoutSummary, CreditProfile, NotaDiscount, PaymentOutcome, PaymentStatus,
    TransactionStatus,
};

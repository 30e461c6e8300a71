//! Shared checkout calculation core: cart arithmetic, nota discount
//! resolution, and the payment/debt rules. Pure functions, no I/O; both the
//! purchase and sales flows consume this module.

pub mod models;
pub mod services;

//! Backend for an Indonesian trading company's operations dashboard:
//! catalog and stock, purchasing, sales, hutang/piutang tracking, payroll,
//! expenses, and management reports.
//!
//! All money is whole rupiah carried as [`rust_decimal::Decimal`]. Both
//! transaction flows share one calculation core in [`modules::checkout`];
//! checkout persists its snapshot, the stock movement, and any debt record
//! in a single database transaction.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

pub mod debt_service;

pub use debt_service::DebtService;

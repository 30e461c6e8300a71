pub mod catalog;
pub mod checkout;
pub mod debts;
pub mod employees;
pub mod expenses;
pub mod partners;
pub mod purchases;
pub mod reports;
pub mod sales;

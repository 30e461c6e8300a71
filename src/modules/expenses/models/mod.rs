pub mod pengeluaran;

pub use pengeluaran::{CreatePengeluaranRequest, Pengeluaran};

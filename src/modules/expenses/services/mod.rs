pub mod pengeluaran_service;

pub use pengeluaran_service::PengeluaranService;

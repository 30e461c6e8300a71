pub mod pengeluaran_repository;

pub use pengeluaran_repository::PengeluaranRepository;

pub mod penjualan_repository;

pub use penjualan_repository::PenjualanRepository;

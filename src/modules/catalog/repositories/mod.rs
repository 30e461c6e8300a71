pub mod barang_repository;

pub use barang_repository::BarangRepository;

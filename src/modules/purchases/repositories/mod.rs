pub mod pembelian_repository;

pub use pembelian_repository::PembelianRepository;

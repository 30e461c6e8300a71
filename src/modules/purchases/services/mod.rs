pub mod pembelian_service;

pub use pembelian_service::PembelianService;

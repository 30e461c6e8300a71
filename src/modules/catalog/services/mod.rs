pub mod barang_service;

pub use barang_service::BarangService;

pub mod penjualan_service;

pub use penjualan_service::PenjualanService;

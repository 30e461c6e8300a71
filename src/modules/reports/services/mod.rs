pub mod laporan_service;

pub use laporan_service::LaporanService;

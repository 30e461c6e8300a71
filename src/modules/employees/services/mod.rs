pub mod karyawan_service;
pub mod penggajian_service;

pub use karyawan_service::KaryawanService;
pub use penggajian_service::PenggajianService;

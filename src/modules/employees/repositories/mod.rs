pub mod karyawan_repository;
pub mod penggajian_repository;

pub use karyawan_repository::KaryawanRepository;
pub use penggajian_repository::PenggajianRepository;

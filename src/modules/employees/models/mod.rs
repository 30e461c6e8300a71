pub mod karyawan;
pub mod penggajian;

pub use karyawan::{CreateKaryawanRequest, Karyawan, UpdateKaryawanRequest};
pub use penggajian::{CreatePenggajianRequest, Penggajian};

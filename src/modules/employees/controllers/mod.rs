pub mod karyawan_controller;
pub mod penggajian_controller;

pub mod laporan_repository;

pub use laporan_repository::{LaporanRepository, TransaksiTable};

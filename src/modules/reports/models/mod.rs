pub mod laporan;

pub use laporan::{
    DateRange, DebtAggregate, LaporanHutangPiutang, LaporanTransaksi, TransaksiAggregate,
    MAX_RANGE_HARI,
};

pub mod pembelian;

pub use pembelian::{
    CheckoutPembelianRequest, CreatePembelianLengkapRequest, CreatePembelianRequest, Pembelian,
    PembelianItem, PembelianItemRequest,
};

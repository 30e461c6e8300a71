pub mod penjualan;

pub use penjualan::{
    CheckoutPenjualanRequest, CreatePenjualanLengkapRequest, CreatePenjualanRequest, Penjualan,
    PenjualanItem, PenjualanItemRequest, PELANGGAN_UMUM,
};

pub mod barang;

pub use barang::{Barang, CreateBarangRequest, UpdateBarangRequest};

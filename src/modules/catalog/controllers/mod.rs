pub mod barang_controller;

pub mod penjualan_controller;

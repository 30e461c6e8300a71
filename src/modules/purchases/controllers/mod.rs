pub mod pembelian_controller;

pub mod laporan_controller;

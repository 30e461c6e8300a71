pub mod pengeluaran_controller;

pub mod debt_controller;

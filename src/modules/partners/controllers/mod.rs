pub mod partner_controller;

pub use partner_controller::PartnerServices;

pub mod partner;

pub use partner::{CreatePartnerRequest, Partner, PartnerKind, UpdatePartnerRequest};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::money;
use crate::core::{AppError, Result};
use crate::modules::checkout::models::CreditProfile;

/// A trading counterparty. Suppliers and customers carry the same shape:
/// contact details plus a credit limit and the outstanding debt currently
/// held against them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Partner {
    pub id: String,
    pub nama: String,
    pub alamat: Option<String>,
    pub telepon: Option<String>,
    /// Credit limit; zero means unlimited
    pub limit_hutang: Decimal,
    /// Outstanding debt, maintained by the checkout and debt flows only
    pub total_hutang: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Which table a partner lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartnerKind {
    Supplier,
    Customer,
}

impl PartnerKind {
    pub fn table(&self) -> &'static str {
        match self {
            Self::Supplier => "supplier",
            Self::Customer => "customer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Supplier => "Supplier",
            Self::Customer => "Customer",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePartnerRequest {
    pub nama: String,
    pub alamat: Option<String>,
    pub telepon: Option<String>,
    #[serde(default)]
    pub limit_hutang: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePartnerRequest {
    pub nama: String,
    pub alamat: Option<String>,
    pub telepon: Option<String>,
    pub limit_hutang: Decimal,
}

impl Partner {
    pub fn new(request: CreatePartnerRequest) -> Result<Self> {
        Self::validate_nama(&request.nama)?;
        money::validate_rupiah(request.limit_hutang).map_err(AppError::validation)?;

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            nama: request.nama.trim().to_string(),
            alamat: request.alamat,
            telepon: request.telepon,
            limit_hutang: request.limit_hutang,
            total_hutang: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply an update. `total_hutang` is deliberately not writable here;
    /// only checkout and debt payments move it.
    pub fn apply_update(&mut self, request: UpdatePartnerRequest) -> Result<()> {
        Self::validate_nama(&request.nama)?;
        money::validate_rupiah(request.limit_hutang).map_err(AppError::validation)?;

        self.nama = request.nama.trim().to_string();
        self.alamat = request.alamat;
        self.telepon = request.telepon;
        self.limit_hutang = request.limit_hutang;
        self.updated_at = Utc::now();

        Ok(())
    }

    /// Credit standing used by the payment evaluator.
    pub fn credit_profile(&self) -> CreditProfile {
        CreditProfile::new(self.limit_hutang, self.total_hutang)
    }

    fn validate_nama(nama: &str) -> Result<()> {
        if nama.trim().is_empty() {
            return Err(AppError::validation("Nama tidak boleh kosong"));
        }
        if nama.len() > 255 {
            return Err(AppError::validation("Nama maksimal 255 karakter"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreatePartnerRequest {
        CreatePartnerRequest {
            nama: "UD Sumber Rejeki".to_string(),
            alamat: Some("Jl. Pasar Baru 12".to_string()),
            telepon: None,
            limit_hutang: Decimal::from(5_000_000),
        }
    }

    #[test]
    fn test_partner_creation() {
        let partner = Partner::new(valid_request()).unwrap();
        assert_eq!(partner.nama, "UD Sumber Rejeki");
        assert_eq!(partner.total_hutang, Decimal::ZERO);
    }

    #[test]
    fn test_partner_rejects_empty_name() {
        let mut req = valid_request();
        req.nama = " ".to_string();
        assert!(Partner::new(req).is_err());
    }

    #[test]
    fn test_partner_rejects_negative_limit() {
        let mut req = valid_request();
        req.limit_hutang = Decimal::from(-1);
        assert!(Partner::new(req).is_err());
    }

    #[test]
    fn test_credit_profile_reflects_outstanding() {
        let mut partner = Partner::new(valid_request()).unwrap();
        partner.total_hutang = Decimal::from(2_000_000);

        let profile = partner.credit_profile();
        assert_eq!(profile.sisa_limit(), Decimal::from(3_000_000));
    }

    #[test]
    fn test_update_does_not_touch_outstanding() {
        let mut partner = Partner::new(valid_request()).unwrap();
        partner.total_hutang = Decimal::from(1_000_000);

        partner
            .apply_update(UpdatePartnerRequest {
                nama: "UD Sumber Rejeki Baru".to_string(),
                alamat: None,
                telepon: Some("0812".to_string()),
                limit_hutang: Decimal::from(10_000_000),
            })
            .unwrap();

        assert_eq!(partner.total_hutang, Decimal::from(1_000_000));
        assert_eq!(partner.limit_hutang, Decimal::from(10_000_000));
    }
}

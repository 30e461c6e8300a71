use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::money;
use crate::core::{AppError, Result};

/// A goods/inventory item. Stock is tracked in pieces; box quantities
/// convert through `isi_per_dus`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Barang {
    pub id: String,
    pub kode: String,
    pub nama: String,
    /// Pieces per box
    pub isi_per_dus: u32,
    /// Purchase price per box
    pub harga_beli: Decimal,
    /// Sale price per box
    pub harga_jual_dus: Decimal,
    /// Sale price per loose piece
    pub harga_jual_eceran: Decimal,
    /// Stock on hand, in pieces
    pub stok: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBarangRequest {
    pub kode: String,
    pub nama: String,
    pub isi_per_dus: u32,
    pub harga_beli: Decimal,
    pub harga_jual_dus: Decimal,
    pub harga_jual_eceran: Decimal,
    #[serde(default)]
    pub stok: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBarangRequest {
    pub nama: String,
    pub isi_per_dus: u32,
    pub harga_beli: Decimal,
    pub harga_jual_dus: Decimal,
    pub harga_jual_eceran: Decimal,
}

impl Barang {
    pub fn new(request: CreateBarangRequest) -> Result<Self> {
        Self::validate_kode(&request.kode)?;
        Self::validate_nama(&request.nama)?;
        Self::validate_pricing(
            request.isi_per_dus,
            request.harga_beli,
            request.harga_jual_dus,
            request.harga_jual_eceran,
        )?;

        if request.stok < 0 {
            return Err(AppError::validation("Stok awal tidak boleh negatif"));
        }

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            kode: request.kode.trim().to_string(),
            nama: request.nama.trim().to_string(),
            isi_per_dus: request.isi_per_dus,
            harga_beli: request.harga_beli,
            harga_jual_dus: request.harga_jual_dus,
            harga_jual_eceran: request.harga_jual_eceran,
            stok: request.stok,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_update(&mut self, request: UpdateBarangRequest) -> Result<()> {
        Self::validate_nama(&request.nama)?;
        Self::validate_pricing(
            request.isi_per_dus,
            request.harga_beli,
            request.harga_jual_dus,
            request.harga_jual_eceran,
        )?;

        self.nama = request.nama.trim().to_string();
        self.isi_per_dus = request.isi_per_dus;
        self.harga_beli = request.harga_beli;
        self.harga_jual_dus = request.harga_jual_dus;
        self.harga_jual_eceran = request.harga_jual_eceran;
        self.updated_at = Utc::now();

        Ok(())
    }

    fn validate_kode(kode: &str) -> Result<()> {
        if kode.trim().is_empty() {
            return Err(AppError::validation("Kode barang tidak boleh kosong"));
        }
        if kode.len() > 50 {
            return Err(AppError::validation("Kode barang maksimal 50 karakter"));
        }
        Ok(())
    }

    fn validate_nama(nama: &str) -> Result<()> {
        if nama.trim().is_empty() {
            return Err(AppError::validation("Nama barang tidak boleh kosong"));
        }
        if nama.len() > 255 {
            return Err(AppError::validation("Nama barang maksimal 255 karakter"));
        }
        Ok(())
    }

    fn validate_pricing(
        isi_per_dus: u32,
        harga_beli: Decimal,
        harga_jual_dus: Decimal,
        harga_jual_eceran: Decimal,
    ) -> Result<()> {
        if isi_per_dus == 0 {
            return Err(AppError::validation("Isi per dus minimal 1"));
        }
        money::validate_rupiah(harga_beli).map_err(AppError::validation)?;
        money::validate_rupiah(harga_jual_dus).map_err(AppError::validation)?;
        money::validate_rupiah(harga_jual_eceran).map_err(AppError::validation)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateBarangRequest {
        CreateBarangRequest {
            kode: "MG-01".to_string(),
            nama: "Minyak Goreng 1L".to_string(),
            isi_per_dus: 12,
            harga_beli: Decimal::from(150_000),
            harga_jual_dus: Decimal::from(180_000),
            harga_jual_eceran: Decimal::from(16_000),
            stok: 0,
        }
    }

    #[test]
    fn test_barang_creation_valid() {
        let barang = Barang::new(valid_request()).unwrap();
        assert_eq!(barang.kode, "MG-01");
        assert_eq!(barang.isi_per_dus, 12);
        assert_eq!(barang.stok, 0);
    }

    #[test]
    fn test_barang_rejects_empty_kode() {
        let mut req = valid_request();
        req.kode = "  ".to_string();
        assert!(Barang::new(req).is_err());
    }

    #[test]
    fn test_barang_rejects_zero_isi() {
        let mut req = valid_request();
        req.isi_per_dus = 0;
        assert!(Barang::new(req).is_err());
    }

    #[test]
    fn test_barang_rejects_negative_price() {
        let mut req = valid_request();
        req.harga_beli = Decimal::from(-1);
        assert!(Barang::new(req).is_err());
    }

    #[test]
    fn test_barang_update() {
        let mut barang = Barang::new(valid_request()).unwrap();
        barang
            .apply_update(UpdateBarangRequest {
                nama: "Minyak Goreng 2L".to_string(),
                isi_per_dus: 6,
                harga_beli: Decimal::from(160_000),
                harga_jual_dus: Decimal::from(192_000),
                harga_jual_eceran: Decimal::from(33_000),
            })
            .unwrap();

        assert_eq!(barang.nama, "Minyak Goreng 2L");
        assert_eq!(barang.isi_per_dus, 6);
        // kode is immutable through update
        assert_eq!(barang.kode, "MG-01");
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::money;
use crate::core::{AppError, Result};

/// An employee. Deactivation is soft; payroll history keeps pointing at
/// the record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Karyawan {
    pub id: String,
    pub nama: String,
    pub jabatan: Option<String>,
    pub telepon: Option<String>,
    pub gaji_pokok: Decimal,
    pub aktif: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateKaryawanRequest {
    pub nama: String,
    pub jabatan: Option<String>,
    pub telepon: Option<String>,
    pub gaji_pokok: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdateKaryawanRequest {
    pub nama: String,
    pub jabatan: Option<String>,
    pub telepon: Option<String>,
    pub gaji_pokok: Decimal,
    pub aktif: bool,
}

impl Karyawan {
    pub fn new(req: CreateKaryawanRequest) -> Result<Self> {
        if req.nama.trim().is_empty() {
            return Err(AppError::validation("Nama karyawan tidak boleh kosong"));
        }
        money::validate_rupiah(req.gaji_pokok).map_err(AppError::validation)?;

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            nama: req.nama.trim().to_string(),
            jabatan: req.jabatan,
            telepon: req.telepon,
            gaji_pokok: req.gaji_pokok,
            aktif: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_update(&mut self, req: UpdateKaryawanRequest) -> Result<()> {
        if req.nama.trim().is_empty() {
            return Err(AppError::validation("Nama karyawan tidak boleh kosong"));
        }
        money::validate_rupiah(req.gaji_pokok).map_err(AppError::validation)?;

        self.nama = req.nama.trim().to_string();
        self.jabatan = req.jabatan;
        self.telepon = req.telepon;
        self.gaji_pokok = req.gaji_pokok;
        self.aktif = req.aktif;
        self.updated_at = Utc::now();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn test_new_karyawan_starts_active() {
        let karyawan = Karyawan::new(CreateKaryawanRequest {
            nama: " Budi ".to_string(),
            jabatan: Some("Sopir".to_string()),
            telepon: None,
            gaji_pokok: dec(2_500_000),
        })
        .unwrap();

        assert!(karyawan.aktif);
        assert_eq!(karyawan.nama, "Budi");
    }

    #[test]
    fn test_blank_name_rejected() {
        let result = Karyawan::new(CreateKaryawanRequest {
            nama: "   ".to_string(),
            jabatan: None,
            telepon: None,
            gaji_pokok: dec(2_500_000),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_update_can_deactivate() {
        let mut karyawan = Karyawan::new(CreateKaryawanRequest {
            nama: "Budi".to_string(),
            jabatan: None,
            telepon: None,
            gaji_pokok: dec(2_500_000),
        })
        .unwrap();

        karyawan
            .apply_update(UpdateKaryawanRequest {
                nama: "Budi".to_string(),
                jabatan: Some("Gudang".to_string()),
                telepon: None,
                gaji_pokok: dec(2_750_000),
                aktif: false,
            })
            .unwrap();

        assert!(!karyawan.aktif);
        assert_eq!(karyawan.gaji_pokok, dec(2_750_000));
    }

    #[test]
    fn test_negative_salary_rejected() {
        let result = Karyawan::new(CreateKaryawanRequest {
            nama: "Budi".to_string(),
            jabatan: None,
            telepon: None,
            gaji_pokok: dec(-1),
        });
        assert!(result.is_err());
    }
}

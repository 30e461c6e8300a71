use chrono::NaiveDate;
use uuid::Uuid;

/// Human-readable nota number: prefix, date, short random suffix.
/// Uniqueness rides on the suffix; the date part is for the humans reading
/// printed receipts.
pub fn generate_nomor(prefix: &str, tanggal: NaiveDate) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        prefix,
        tanggal.format("%Y%m%d"),
        suffix[..6].to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nomor_shape() {
        let tanggal = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        let nomor = generate_nomor("PJ", tanggal);

        assert!(nomor.starts_with("PJ-20260823-"));
        assert_eq!(nomor.len(), "PJ-20260823-".len() + 6);
    }

    #[test]
    fn test_nomor_is_unique() {
        let tanggal = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        assert_ne!(generate_nomor("PB", tanggal), generate_nomor("PB", tanggal));
    }
}

use serde::Serialize;

/// Response envelope used by every endpoint: `{ success, data, error }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Paginated list payload: data plus the paging cursor the client echoes
/// back for the next page.
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub items: Vec<T>,
    pub limit: i64,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::ok(vec![1, 2, 3])).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], serde_json::json!([1, 2, 3]));
        assert!(body["error"].is_null());
    }
}

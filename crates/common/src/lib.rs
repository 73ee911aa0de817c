pub mod env;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_serializes_expected_fields() {
        let h = types::Health {
            status: "healthy",
            timestamp: "2024-01-01T00:00:00Z".into(),
            database: "connected",
        };
        let json = serde_json::to_value(&h).expect("serialize health");
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["database"], "connected");
    }
}

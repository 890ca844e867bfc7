use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to search for venues
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(min = 1, message = "No query provided"))]
    #[serde(default)]
    pub query: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_query_fails_validation() {
        let req: SearchRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_query_passes_validation() {
        let req: SearchRequest =
            serde_json::from_str(r#"{"query": "Turkish restaurant"}"#).unwrap();
        assert!(req.validate().is_ok());
    }
}

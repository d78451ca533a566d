//! Review record types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single feedback item as loaded from a daily review batch.
///
/// Batch files carry one JSON array of these per day; only `text` is
/// required, the rest is passed through for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Free-text feedback body
    pub text: String,
    /// Star rating, if the source platform provides one
    #[serde(default)]
    pub rating: Option<u8>,
    /// Submission date; falls back to the batch date when absent
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_text_only() {
        let review: Review = serde_json::from_str(r#"{"text": "login is broken"}"#).unwrap();
        assert_eq!(review.text, "login is broken");
        assert_eq!(review.rating, None);
        assert_eq!(review.date, None);
    }

    #[test]
    fn test_deserialize_full() {
        let review: Review =
            serde_json::from_str(r#"{"text": "slow app", "rating": 2, "date": "2024-06-01"}"#)
                .unwrap();
        assert_eq!(review.rating, Some(2));
        assert_eq!(
            review.date,
            Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        );
    }
}

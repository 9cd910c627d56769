//! Session name derivation for the history panel selector.

use crate::types::HistoryRecord;

/// De-duplicated session names from a history listing, first
/// occurrence order preserved. Records without a session name are
/// skipped; they cannot be filtered or deleted by name.
pub fn unique_session_names(records: &[HistoryRecord]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in records {
        if let Some(name) = &record.session_name {
            if !names.iter().any(|n| n == name) {
                names.push(name.clone());
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(session: Option<&str>) -> HistoryRecord {
        HistoryRecord {
            session_name: session.map(String::from),
            message: "q".into(),
            response: "a".into(),
            timestamp: "2024-01-01 10:00:00".into(),
        }
    }

    #[test]
    fn test_dedupes_preserving_order() {
        let records = vec![
            record(Some("3")),
            record(Some("1")),
            record(Some("3")),
            record(Some("2")),
            record(Some("1")),
        ];
        assert_eq!(unique_session_names(&records), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_skips_missing_names() {
        let records = vec![record(None), record(Some("1")), record(None)];
        assert_eq!(unique_session_names(&records), vec!["1"]);
    }

    #[test]
    fn test_empty_history() {
        assert!(unique_session_names(&[]).is_empty());
    }
}

use chrono::{DateTime, Utc};

/// RFC3339 timestamp stamped onto event payloads.
pub fn now_rfc3339() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_parse_back() {
        let stamp = now_rfc3339();
        assert!(DateTime::parse_from_rfc3339(&stamp).is_ok());
    }
}

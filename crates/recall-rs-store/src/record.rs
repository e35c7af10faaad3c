//! Recall record model persisted by the codec.

use crate::error::RecallError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A note attached to one absolute directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Recall {
    /// Last time the message was set.
    #[serde(with = "rfc3339")]
    pub time: DateTime<Utc>,
    /// Canonical absolute directory the recall belongs to.
    pub dir: String,
    /// Message as entered, whitespace-trimmed.
    pub msg: String,
}

impl Recall {
    /// Create a recall stamped with the current time.
    pub fn new(dir: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            time: Utc::now(),
            dir: dir.into(),
            msg: msg.into(),
        }
    }
}

/// Rules applied to messages at entry time, before they reach the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessagePolicy {
    /// Reject messages spanning more than one line.
    pub single_line: bool,
}

impl MessagePolicy {
    /// Check a candidate message. Surrounding whitespace is ignored.
    pub fn validate(&self, msg: &str) -> Result<(), RecallError> {
        let trimmed = msg.trim();
        if trimmed.is_empty() {
            return Err(RecallError::InvalidMessage(
                "recall message is empty".to_string(),
            ));
        }
        if self.single_line && trimmed.contains(['\n', '\r']) {
            return Err(RecallError::InvalidMessage(
                "newline characters are not allowed inside a recall".to_string(),
            ));
        }
        Ok(())
    }
}

/// RFC 3339 timestamps with an explicit offset, written in UTC.
mod rfc3339 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        time: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|time| time.with_timezone(&Utc))
            .map_err(|err| D::Error::custom(format!("invalid timestamp {raw:?}: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::{MessagePolicy, Recall};
    use crate::RecallError;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn serializes_time_as_utc_rfc3339() {
        let recall = Recall {
            time: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            dir: "/home/u/proj".to_string(),
            msg: "pick up at step 3".to_string(),
        };
        let json = serde_json::to_string(&recall).expect("serialize");
        assert_eq!(
            json,
            r#"{"time":"2024-03-01T09:30:00Z","dir":"/home/u/proj","msg":"pick up at step 3"}"#
        );
    }

    #[test]
    fn accepts_offsets_and_normalizes_to_utc() {
        let json = r#"{"time":"2024-03-01T11:30:00+02:00","dir":"/tmp","msg":"m"}"#;
        let recall: Recall = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            recall.time,
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn rejects_timestamps_without_offset() {
        let json = r#"{"time":"2024-03-01T09:30:00","dir":"/tmp","msg":"m"}"#;
        let err = serde_json::from_str::<Recall>(json).unwrap_err();
        assert!(err.to_string().contains("invalid timestamp"));
    }

    #[test]
    fn multi_line_messages_pass_the_default_policy() {
        let policy = MessagePolicy::default();
        policy.validate("first\nsecond").expect("multi-line allowed");
    }

    #[test]
    fn single_line_policy_rejects_inner_newlines_only() {
        let policy = MessagePolicy { single_line: true };
        policy
            .validate("  trailing newline is trimmed\n")
            .expect("outer whitespace ignored");
        let err = policy.validate("first\nsecond").unwrap_err();
        assert!(matches!(err, RecallError::InvalidMessage(_)));
    }

    #[test]
    fn empty_messages_are_rejected() {
        let err = MessagePolicy::default().validate(" \n\t ").unwrap_err();
        assert_eq!(err.to_string(), "invalid message: recall message is empty");
    }
}

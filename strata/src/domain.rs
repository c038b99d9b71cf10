use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::Error;
use uuid::Uuid;

/// A stored record. Only the durable tier keeps the full shape; the faster
/// tiers hold a key -> payload projection of it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Record {
    pub key: Uuid,
    pub payload: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record {
    pub fn new(key: Uuid, payload: impl Into<String>) -> Self {
        Self {
            key,
            payload: payload.into(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// Selector for the persistence tiers behind the service
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TierKind {
    File,
    Durable,
}

impl TryFrom<&str> for TierKind {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "file" => Ok(TierKind::File),
            "durable" | "db" => Ok(TierKind::Durable),
            other => Err(Error::UnknownTier(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_kind_from_known_selectors() {
        assert_eq!(TierKind::try_from("file").unwrap(), TierKind::File);
        assert_eq!(TierKind::try_from("durable").unwrap(), TierKind::Durable);
        assert_eq!(TierKind::try_from("db").unwrap(), TierKind::Durable);
    }

    #[test]
    fn tier_kind_rejects_unknown_selector() {
        let result = TierKind::try_from("redis");
        assert!(matches!(result, Err(Error::UnknownTier(ref s)) if s == "redis"));
    }

    #[test]
    fn new_record_has_no_update_timestamp() {
        let record = Record::new(Uuid::new_v4(), "payload");
        assert!(record.updated_at.is_none());
        assert_eq!(record.payload, "payload");
    }
}

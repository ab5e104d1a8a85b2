use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Singleton user record: streak, token balance, claim bookkeeping, and the
/// operator testing flag. Loaded once at startup and persisted after every
/// mutation; fields missing from an older stored record fall back to the
/// defaults on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserLedger {
    pub streak: u32,
    pub last_sleep_date: Option<NaiveDate>,
    pub tokens: u64,
    pub last_claim_date: Option<NaiveDate>,
    pub testing_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
}

impl Default for UserLedger {
    fn default() -> Self {
        Self {
            streak: 0,
            last_sleep_date: None,
            tokens: 0,
            last_claim_date: None,
            testing_mode: false,
            wallet_address: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_round_trips_through_json() {
        let ledger = UserLedger {
            streak: 4,
            last_sleep_date: Some("2024-01-02".parse().unwrap()),
            tokens: 37,
            last_claim_date: Some("2024-01-03".parse().unwrap()),
            testing_mode: true,
            wallet_address: Some("0xabc".into()),
        };

        let json = serde_json::to_string(&ledger).unwrap();
        let restored: UserLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(ledger, restored);
    }

    #[test]
    fn partial_record_merges_over_defaults() {
        let restored: UserLedger = serde_json::from_str(r#"{"streak":3,"tokens":12}"#).unwrap();
        assert_eq!(restored.streak, 3);
        assert_eq!(restored.tokens, 12);
        assert_eq!(restored.last_sleep_date, None);
        assert!(!restored.testing_mode);
        assert_eq!(restored.wallet_address, None);
    }

    #[test]
    fn absent_wallet_address_is_omitted() {
        let json = serde_json::to_value(UserLedger::default()).unwrap();
        assert!(json.get("walletAddress").is_none());
        assert!(json.get("lastSleepDate").is_some());
        assert!(json.get("testingMode").is_some());
    }
}

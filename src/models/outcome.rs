// src/models/outcome.rs
//! Result payload delivered by the verifier widget.

use serde::{Deserialize, Deserializer, Serialize};

/// Outcome of a successful verification.
///
/// The widget only reports success, so receiving an outcome means the
/// protocol confirmed the proof. The transaction identifier is present when
/// the verifier relayed the claim on-chain itself; a blank identifier counts
/// as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    #[serde(
        default,
        rename = "tx_hash",
        alias = "txHash",
        alias = "transactionId",
        deserialize_with = "non_blank",
        skip_serializing_if = "Option::is_none"
    )]
    pub transaction_id: Option<String>,
}

impl VerificationOutcome {
    #[allow(dead_code)]
    pub fn with_transaction(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: Some(transaction_id.into()),
        }
    }

    /// Outcome without an on-chain transaction reference.
    #[allow(dead_code)]
    pub fn without_transaction() -> Self {
        Self::default()
    }

    /// Transaction identifier, with blank values treated as missing.
    pub fn into_transaction_id(self) -> Option<String> {
        self.transaction_id.filter(|tx| !tx.trim().is_empty())
    }
}

fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|tx| !tx.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_widget_field_spellings() {
        let a: VerificationOutcome = serde_json::from_str(r#"{"txHash":"0x1"}"#).unwrap();
        let b: VerificationOutcome = serde_json::from_str(r#"{"tx_hash":"0x1"}"#).unwrap();
        let c: VerificationOutcome = serde_json::from_str(r#"{"transactionId":"0x1"}"#).unwrap();
        let empty: VerificationOutcome = serde_json::from_str("{}").unwrap();

        assert_eq!(a, VerificationOutcome::with_transaction("0x1"));
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(empty, VerificationOutcome::without_transaction());
    }

    #[test]
    fn test_blank_transaction_id_is_absent() {
        let blank: VerificationOutcome = serde_json::from_str(r#"{"txHash":""}"#).unwrap();
        let spaces: VerificationOutcome = serde_json::from_str(r#"{"tx_hash":"  "}"#).unwrap();
        let null: VerificationOutcome = serde_json::from_str(r#"{"txHash":null}"#).unwrap();

        assert_eq!(blank, VerificationOutcome::without_transaction());
        assert_eq!(spaces, VerificationOutcome::without_transaction());
        assert_eq!(null, VerificationOutcome::without_transaction());
        assert_eq!(VerificationOutcome::with_transaction("").into_transaction_id(), None);
        assert_eq!(
            VerificationOutcome::with_transaction("0x1").into_transaction_id(),
            Some("0x1".to_string())
        );
    }
}

// src/models/session.rs
//! Verification session data model.
//!
//! A [`SessionConfiguration`] is the parameter set handed to the external
//! verifier widget to start a challenge. Field names serialize in the
//! camelCase form the widget expects.

use crate::models::address::NormalizedAddress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Network the verifier reports to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    Celo,
    StagingCelo,
    Https,
    StagingHttps,
}

/// Encoding of the subject identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserIdKind {
    Hex,
    Uuid,
}

/// A document attribute the verifier is asked to disclose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disclosure {
    IssuingState,
    Name,
    Nationality,
    DateOfBirth,
    PassportNumber,
    Gender,
    ExpiryDate,
}

impl FromStr for Disclosure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "issuing_state" => Ok(Self::IssuingState),
            "name" => Ok(Self::Name),
            "nationality" => Ok(Self::Nationality),
            "date_of_birth" => Ok(Self::DateOfBirth),
            "passport_number" => Ok(Self::PassportNumber),
            "gender" => Ok(Self::Gender),
            "expiry_date" => Ok(Self::ExpiryDate),
            other => Err(format!("unknown disclosure `{}`", other)),
        }
    }
}

/// Set of requested attributes, serialized as `{ "<attribute>": true, ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisclosureSet(BTreeSet<Disclosure>);

impl DisclosureSet {
    pub fn new(items: impl IntoIterator<Item = Disclosure>) -> Self {
        Self(items.into_iter().collect())
    }

    /// Parses a comma separated list such as `"date_of_birth,nationality"`.
    pub fn parse_list(list: &str) -> Result<Self, String> {
        list.split(',')
            .filter(|item| !item.trim().is_empty())
            .map(Disclosure::from_str)
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    #[allow(dead_code)]
    pub fn contains(&self, disclosure: Disclosure) -> bool {
        self.0.contains(&disclosure)
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Serialize for DisclosureSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for disclosure in &self.0 {
            map.serialize_entry(disclosure, &true)?;
        }
        map.end()
    }
}

/// Parameters handed to the verifier widget.
///
/// Immutable once built; a new address produces a new configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfiguration {
    pub app_name: String,
    pub scope: String,
    /// On-chain contract that receives the proof
    pub endpoint: String,
    pub endpoint_type: EndpointKind,
    pub logo_base64: String,
    /// Subject identifier, always the normalized wallet address
    pub user_id: NormalizedAddress,
    pub user_id_type: UserIdKind,
    pub disclosures: DisclosureSet,
    pub dev_mode: bool,
}

/// Opaque identifier of one verification session.
///
/// Fresh for every session and compared on every completion callback, so an
/// outcome can never be credited to a session that has been replaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Builds an id from a per-page sequence number and a random nonce.
    pub fn generate(sequence: u64) -> Self {
        Self(format!("{:08x}-{:016x}", sequence, rand::random::<u64>()))
    }

    #[allow(dead_code)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The single active session of a page: its identity and configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveSession {
    pub id: SessionId,
    pub config: SessionConfiguration,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_disclosure_set_serializes_as_flag_map() {
        let set = DisclosureSet::new([Disclosure::Nationality, Disclosure::DateOfBirth]);
        let value = serde_json::to_value(&set).unwrap();

        assert_eq!(value, json!({ "nationality": true, "date_of_birth": true }));
    }

    #[test]
    fn test_parse_list() {
        let set = DisclosureSet::parse_list(" date_of_birth, name ,").unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(Disclosure::DateOfBirth));
        assert!(set.contains(Disclosure::Name));

        assert!(DisclosureSet::parse_list("shoe_size").is_err());
        assert_eq!(DisclosureSet::parse_list("").unwrap().len(), 0);
    }

    #[test]
    fn test_session_ids_are_distinct() {
        let a = SessionId::generate(1);
        let b = SessionId::generate(1);
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("00000001-"));
    }
}

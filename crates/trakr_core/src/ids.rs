use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AllocationError, TrakrError, TrakrResult};

// Upper 32 bits = namespace, lower 32 bits = store-local sequence.
const SEQUENCE_BITS: u32 = 32;
const SEQUENCE_MASK: u64 = (1u64 << SEQUENCE_BITS) - 1;

/// Owner of a set of rows (user or installation). Supplied by the host, never minted here.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceId(pub u32);

impl NamespaceId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for NamespaceId {
    type Error = TrakrError;

    fn try_from(value: i64) -> TrakrResult<Self> {
        u32::try_from(value)
            .map(NamespaceId)
            .map_err(|_| TrakrError::invalid(format!("namespace {value} is outside [0, 2^32)")))
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 64-bit primary key: `(namespace << 32) | sequence`.
///
/// Stored in SQLite `INTEGER` columns as the bit-identical `i64`, so ids of
/// namespaces at or above `2^31` read back negative on the SQL side while
/// still ordering by sequence within their namespace.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniqueId(u64);

impl UniqueId {
    /// Combines a namespace with a freshly allocated sequence value.
    ///
    /// Sequences start at 1. A sequence past `u32::MAX`, or the single composite
    /// whose storage form is `-1`, is reported as exhaustion.
    pub fn compose(namespace: NamespaceId, sequence: i64) -> Result<Self, AllocationError> {
        if sequence < 1 {
            return Err(AllocationError::insert(format!(
                "sequence read back as {sequence}"
            )));
        }
        let sequence_bits = u32::try_from(sequence)
            .map_err(|_| AllocationError::SequenceExhausted { sequence })?;
        let raw = (u64::from(namespace.0) << SEQUENCE_BITS) | u64::from(sequence_bits);
        if raw == u64::MAX {
            return Err(AllocationError::SequenceExhausted { sequence });
        }
        Ok(Self(raw))
    }

    pub fn namespace(self) -> NamespaceId {
        NamespaceId((self.0 >> SEQUENCE_BITS) as u32)
    }

    pub fn sequence(self) -> u32 {
        (self.0 & SEQUENCE_MASK) as u32
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }

    pub fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    pub fn to_i64(self) -> i64 {
        self.0 as i64
    }

    pub fn from_i64(raw: i64) -> Self {
        Self(raw as u64)
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UniqueId {
    type Err = TrakrError;

    fn from_str(value: &str) -> TrakrResult<Self> {
        value
            .trim()
            .parse::<u64>()
            .map(UniqueId)
            .map_err(|err| TrakrError::invalid(format!("invalid id '{value}': {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::{NamespaceId, UniqueId};
    use crate::AllocationError;

    #[test]
    fn compose_and_decode_recover_inputs() {
        let id = UniqueId::compose(NamespaceId(7), 3).expect("compose");
        assert_eq!(id.as_u64(), 7 * (1u64 << 32) + 3);
        assert_eq!(id.namespace(), NamespaceId(7));
        assert_eq!(id.sequence(), 3);
    }

    #[test]
    fn namespace_zero_yields_bare_sequence() {
        let id = UniqueId::compose(NamespaceId(0), 41).expect("compose");
        assert_eq!(id.as_u64(), 41);
        assert_eq!(id.to_i64(), 41);
    }

    #[test]
    fn distinct_namespaces_never_collide() {
        let a = UniqueId::compose(NamespaceId(1), 5).expect("a");
        let b = UniqueId::compose(NamespaceId(2), 5).expect("b");
        let c = UniqueId::compose(NamespaceId(2), (1i64 << 32) - 1).expect("c");
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert!(b < c);
    }

    #[test]
    fn ordering_follows_sequence_within_namespace() {
        let high = NamespaceId(u32::MAX - 1);
        let first = UniqueId::compose(high, 1).expect("first");
        let second = UniqueId::compose(high, 2).expect("second");
        assert!(first < second);
        // Storage form keeps the order even though it is negative.
        assert!(first.to_i64() < second.to_i64());
        assert_eq!(UniqueId::from_i64(second.to_i64()), second);
    }

    #[test]
    fn rejects_out_of_range_sequences() {
        assert!(matches!(
            UniqueId::compose(NamespaceId(1), 1i64 << 32),
            Err(AllocationError::SequenceExhausted { .. })
        ));
        assert!(matches!(
            UniqueId::compose(NamespaceId(u32::MAX), i64::from(u32::MAX)),
            Err(AllocationError::SequenceExhausted { .. })
        ));
        assert!(matches!(
            UniqueId::compose(NamespaceId(1), 0),
            Err(AllocationError::Insert { .. })
        ));
    }

    #[test]
    fn namespace_conversion_checks_range() {
        assert_eq!(NamespaceId::try_from(42i64).expect("ns"), NamespaceId(42));
        assert!(NamespaceId::try_from(-1i64).is_err());
        assert!(NamespaceId::try_from(1i64 << 32).is_err());
    }

    #[test]
    fn parses_and_displays_decimal() {
        let id: UniqueId = "30064771073".parse().expect("parse");
        assert_eq!(id.namespace(), NamespaceId(7));
        assert_eq!(id.sequence(), 1);
        assert_eq!(id.to_string(), "30064771073");
        assert!("not-an-id".parse::<UniqueId>().is_err());
    }

    #[test]
    fn serializes_as_plain_integers() {
        let id = UniqueId::compose(NamespaceId(7), 3).expect("compose");
        assert_eq!(serde_json::to_string(&id).expect("json"), "30064771075");
        let ns: NamespaceId = serde_json::from_str("7").expect("ns");
        assert_eq!(ns, NamespaceId(7));
    }
}

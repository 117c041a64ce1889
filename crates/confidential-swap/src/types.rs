//! identifiers shared across the engine
//!
//! every identifier is a fixed 32-byte value. the all-zero value is the null
//! identity and is rejected wherever a real account or token is required.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::POOL_ID_DOMAIN;

/// seconds, as reported by the clock collaborator
pub type Timestamp = u64;

/// hex for human-readable formats, raw bytes otherwise
pub(crate) mod bytes32 {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            hex::encode(bytes).serialize(serializer)
        } else {
            bytes.serialize(serializer)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            let raw = hex::decode(s.trim_start_matches("0x")).map_err(D::Error::custom)?;
            raw.try_into()
                .map_err(|v: Vec<u8>| D::Error::invalid_length(v.len(), &"32 bytes"))
        } else {
            <[u8; 32]>::deserialize(deserializer)
        }
    }
}

macro_rules! bytes32_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub [u8; 32]);

        impl $name {
            /// the all-zero identity
            pub const NULL: Self = Self([0u8; 32]);

            pub fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn is_null(&self) -> bool {
                self.0 == [0u8; 32]
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// parse 64 hex chars, optional `0x` prefix
            pub fn from_hex(s: &str) -> Option<Self> {
                let raw = hex::decode(s.trim_start_matches("0x")).ok()?;
                let bytes: [u8; 32] = raw.try_into().ok()?;
                Some(Self(bytes))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}..)", stringify!($name), &self.to_hex()[..8])
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                bytes32::serialize(&self.0, serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                bytes32::deserialize(deserializer).map(Self)
            }
        }
    };
}

bytes32_id!(
    /// account identity: callers, the owner, the fee collector
    Identity
);

bytes32_id!(
    /// token identity (mint / contract address)
    TokenId
);

bytes32_id!(
    /// pool key derived from an ordered token pair
    PoolId
);

impl PoolId {
    /// sha256(domain || token_a || token_b)
    ///
    /// order matters: `derive(a, b) != derive(b, a)`
    pub fn derive(token_a: &TokenId, token_b: &TokenId) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(POOL_ID_DOMAIN);
        hasher.update(token_a.as_bytes());
        hasher.update(token_b.as_bytes());
        Self(hasher.finalize().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_id_is_ordered() {
        let dot = TokenId([1u8; 32]);
        let ksm = TokenId([2u8; 32]);

        assert_eq!(PoolId::derive(&dot, &ksm), PoolId::derive(&dot, &ksm));
        assert_ne!(PoolId::derive(&dot, &ksm), PoolId::derive(&ksm, &dot));
    }

    #[test]
    fn test_null_identity() {
        assert!(Identity::NULL.is_null());
        assert!(!Identity([7u8; 32]).is_null());
    }

    #[test]
    fn test_hex_roundtrip() {
        let id = Identity([0xab; 32]);
        assert_eq!(Identity::from_hex(&id.to_hex()), Some(id));
        assert_eq!(Identity::from_hex(&format!("0x{}", id)), Some(id));
        assert_eq!(Identity::from_hex("abcd"), None);
    }

    #[test]
    fn test_json_uses_hex() {
        let token = TokenId([0x11; 32]);
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, format!("\"{}\"", "11".repeat(32)));

        let back: TokenId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }
}

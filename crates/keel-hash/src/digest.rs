use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha1::{Digest as _, Sha1};

use crate::error::HashError;

/// Size of a raw digest in bytes.
pub const DIGEST_LEN: usize = 20;

/// Tag of the only supported hashing algorithm.
pub const DIGEST_ALGORITHM: &str = "sha1";

const HEX_LEN: usize = DIGEST_LEN * 2;

/// Content address of a chunk.
///
/// A `Digest` is the SHA-1 hash of a chunk's bytes. Equal bytes always
/// produce equal digests. The canonical text form is
/// `sha1-` followed by 40 lowercase hex digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Hash raw bytes.
    pub fn of(data: &[u8]) -> Self {
        let hash = Sha1::digest(data);
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(&hash);
        Self(out)
    }

    /// Wrap a digest read off the wire.
    pub const fn from_raw(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// The all-zero digest. Never produced by hashing real content.
    pub const fn null() -> Self {
        Self([0u8; DIGEST_LEN])
    }

    pub fn is_null(&self) -> bool {
        self.0 == [0u8; DIGEST_LEN]
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex digits, without the algorithm prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 8 hex digits, for logs.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse the canonical text form.
    pub fn parse(s: &str) -> Result<Self, HashError> {
        let (algorithm, digits) = s
            .split_once('-')
            .ok_or_else(|| HashError::MissingSeparator(s.to_string()))?;
        if algorithm != DIGEST_ALGORITHM {
            return Err(HashError::UnsupportedAlgorithm(algorithm.to_string()));
        }
        let count = digits.chars().count();
        if count != HEX_LEN {
            return Err(HashError::InvalidLength {
                expected: HEX_LEN,
                actual: count,
            });
        }
        // hex::decode also accepts uppercase; the canonical form does not.
        if let Some((position, digit)) = digits
            .chars()
            .enumerate()
            .find(|(_, c)| !matches!(c, '0'..='9' | 'a'..='f'))
        {
            return Err(HashError::InvalidDigit { digit, position });
        }
        let mut out = [0u8; DIGEST_LEN];
        hex::decode_to_slice(digits, &mut out).map_err(|_| HashError::InvalidLength {
            expected: HEX_LEN,
            actual: digits.len(),
        })?;
        Ok(Self(out))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.short_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DIGEST_ALGORITHM}-{}", self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<Digest> for [u8; DIGEST_LEN] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ZERO: &str = "sha1-0000000000000000000000000000000000000000";

    #[test]
    fn of_is_deterministic() {
        assert_eq!(Digest::of(b"hello"), Digest::of(b"hello"));
        assert_ne!(Digest::of(b"hello"), Digest::of(b"world"));
    }

    #[test]
    fn of_matches_known_sha1() {
        let d = Digest::of(b"abc");
        assert_eq!(d.to_hex(), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn parse_zero() {
        let d = Digest::parse(ZERO).unwrap();
        assert!(d.is_null());
        assert_eq!(d, Digest::parse(ZERO).unwrap());
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(matches!(
            Digest::parse("foo"),
            Err(HashError::MissingSeparator(_))
        ));
        assert!(Digest::parse("sha1").is_err());
        assert!(matches!(
            Digest::parse("sha1-0"),
            Err(HashError::InvalidLength { expected: 40, actual: 1 })
        ));
        assert!(matches!(
            Digest::parse("sha1-00000000000000000000000000000000000000000"),
            Err(HashError::InvalidLength { actual: 41, .. })
        ));
        assert!(Digest::parse("sha1-\t000000000000000000000000000000000000000g").is_err());
        assert!(matches!(
            Digest::parse(&format!("sha1-g{}", "0".repeat(39))),
            Err(HashError::InvalidDigit { digit: 'g', position: 0 })
        ));
        assert!(matches!(
            Digest::parse(&format!("sha2-{}", "0".repeat(40))),
            Err(HashError::UnsupportedAlgorithm(alg)) if alg == "sha2"
        ));
    }

    #[test]
    fn parse_rejects_uppercase() {
        let s = format!("sha1-{}", "A".repeat(40));
        assert!(matches!(
            Digest::parse(&s),
            Err(HashError::InvalidDigit { digit: 'A', .. })
        ));
    }

    #[test]
    fn equality_follows_digits() {
        let r0 = Digest::parse(ZERO).unwrap();
        let r1 = Digest::parse("sha1-0000000000000000000000000000000000000001").unwrap();
        assert_ne!(r0, r1);
        assert!(r0 < r1);
    }

    #[test]
    fn display_is_canonical() {
        let s = "sha1-0123456789abcdef0123456789abcdef01234567";
        let d: Digest = s.parse().unwrap();
        assert_eq!(d.to_string(), s);
    }

    #[test]
    fn serde_uses_text_form() {
        let d = Digest::of(b"serde");
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, format!("\"{d}\""));
        let back: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn serde_rejects_bad_text() {
        let err = serde_json::from_str::<Digest>("\"sha2-00\"");
        assert!(err.is_err());
    }

    proptest! {
        #[test]
        fn text_roundtrip(bytes in any::<[u8; DIGEST_LEN]>()) {
            let d = Digest::from_raw(bytes);
            let text = d.to_string();
            prop_assert_eq!(text.len(), 4 + 1 + 40);
            prop_assert_eq!(Digest::parse(&text).unwrap(), d);
        }

        #[test]
        fn wrong_length_never_parses(n in 0usize..80) {
            prop_assume!(n != 40);
            let s = format!("sha1-{}", "a".repeat(n));
            prop_assert!(Digest::parse(&s).is_err());
        }
    }
}

//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character hexadecimal strings. Users may refer to commits by any
//! unambiguous prefix; `ObjectId` itself always holds the full form.
//!
//! ## Storage
//!
//! Objects are stored in `.twig/objects/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate a full-length object ID
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("Invalid object ID length: {}", id.len()));
        }
        if !Self::is_hex(&id) {
            return Err(anyhow::anyhow!("Invalid object ID characters: {}", id));
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Whether `prefix` could abbreviate an object ID (1..=40 hex characters)
    pub fn is_valid_prefix(prefix: &str) -> bool {
        !prefix.is_empty() && prefix.len() <= OBJECT_ID_LENGTH && Self::is_hex(prefix)
    }

    fn is_hex(value: &str) -> bool {
        value.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Splits the hash as `XX/YYYYYY...` where XX is the first 2 chars.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters of the hash
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const OID: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

    #[test]
    fn splits_into_fan_out_path() {
        let oid = ObjectId::try_parse(OID.to_string()).unwrap();

        assert_eq!(oid.to_path(), PathBuf::from("4b").join(&OID[2..]));
        assert_eq!(oid.to_short_oid(), "4b825dc");
    }

    #[rstest]
    #[case("4b825dc642cb6eb9a060e54bf8d69288fbee490")]
    #[case("4b825dc642cb6eb9a060e54bf8d69288fbee4904a")]
    #[case("zz825dc642cb6eb9a060e54bf8d69288fbee4904")]
    fn rejects_malformed_ids(#[case] id: &str) {
        assert!(ObjectId::try_parse(id.to_string()).is_err());
    }

    #[rstest]
    #[case("4", true)]
    #[case("4B825D", true)]
    #[case("", false)]
    #[case("4b82-", false)]
    fn validates_prefixes(#[case] prefix: &str, #[case] valid: bool) {
        assert_eq!(ObjectId::is_valid_prefix(prefix), valid);
    }
}

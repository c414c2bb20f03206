//! Content-addressed node identifiers.
//!
//! A [`NodeKey`] is derived from a title or tag string by stripping all
//! whitespace and hashing what remains. The digest is pluggable through the
//! [`IdentifierGenerator`] trait; [`Md5Identifier`] and [`Blake3Identifier`]
//! both render 128 bits as 32 lowercase hex characters.
//!
//! Identifiers are never stored alongside entries. They are recomputed on
//! every compile, which is what makes compilation idempotent.

use std::fmt;
use std::str::FromStr;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// Stable identifier of a graph node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(pub String);

impl NodeKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalizes text for hashing.
///
/// Returns `None` when the text is blank after trimming; otherwise the text
/// with every whitespace character removed.
pub fn normalize(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    Some(text.chars().filter(|c| !c.is_whitespace()).collect())
}

/// Derives a stable identifier from human-readable text.
///
/// Implementations must be pure: two inputs that normalize to the same
/// string always map to the same key, across runs and processes.
pub trait IdentifierGenerator {
    /// Hashes already-normalized text.
    fn digest(&self, normalized: &str) -> String;

    /// Short name of the digest, used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Returns the key for `text`, or `None` if the text is blank.
    fn id_for(&self, text: &str) -> Option<NodeKey> {
        normalize(text).map(|n| NodeKey(self.digest(&n)))
    }
}

/// MD5 digest of the normalized text.
///
/// This is the default: graph documents already consumed by the
/// visualization layer carry MD5-derived ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Identifier;

impl IdentifierGenerator for Md5Identifier {
    fn digest(&self, normalized: &str) -> String {
        format!("{:x}", Md5::digest(normalized.as_bytes()))
    }

    fn name(&self) -> &'static str {
        "md5"
    }
}

/// BLAKE3 digest of the normalized text, truncated to 128 bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Identifier;

impl IdentifierGenerator for Blake3Identifier {
    fn digest(&self, normalized: &str) -> String {
        let hex = blake3::hash(normalized.as_bytes()).to_hex();
        hex.as_str()[..32].to_string()
    }

    fn name(&self) -> &'static str {
        "blake3"
    }
}

/// Digest selector for configuration surfaces (CLI flag, env var).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestKind {
    #[default]
    Md5,
    Blake3,
}

impl DigestKind {
    /// Returns the generator for this digest.
    pub fn generator(self) -> Box<dyn IdentifierGenerator + Send + Sync> {
        match self {
            DigestKind::Md5 => Box::new(Md5Identifier),
            DigestKind::Blake3 => Box::new(Blake3Identifier),
        }
    }
}

impl FromStr for DigestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(DigestKind::Md5),
            "blake3" => Ok(DigestKind::Blake3),
            other => Err(format!("unknown digest '{}', expected md5 or blake3", other)),
        }
    }
}

impl fmt::Display for DigestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestKind::Md5 => write!(f, "md5"),
            DigestKind::Blake3 => write!(f, "blake3"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_has_no_id() {
        assert_eq!(Md5Identifier.id_for(""), None);
        assert_eq!(Md5Identifier.id_for("   \t\n"), None);
        assert_eq!(Blake3Identifier.id_for(" "), None);
    }

    #[test]
    fn md5_matches_known_vector() {
        let id = Md5Identifier.id_for("abc").unwrap();
        assert_eq!(id.as_str(), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn whitespace_is_removed_before_hashing() {
        let a = Md5Identifier.id_for("a b c").unwrap();
        let b = Md5Identifier.id_for("  abc ").unwrap();
        let c = Md5Identifier.id_for("a\tb\nc").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.as_str(), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn case_is_significant() {
        let upper = Md5Identifier.id_for("FINANCE").unwrap();
        let lower = Md5Identifier.id_for("Finance").unwrap();
        assert_ne!(upper, lower);
    }

    #[test]
    fn blake3_is_128_bit_hex() {
        let id = Blake3Identifier.id_for("Paper X").unwrap();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(Some(id), Blake3Identifier.id_for("PaperX"));
    }

    #[test]
    fn digests_differ() {
        let md5 = Md5Identifier.id_for("FIN/RISK").unwrap();
        let b3 = Blake3Identifier.id_for("FIN/RISK").unwrap();
        assert_ne!(md5, b3);
    }

    #[test]
    fn digest_kind_parses() {
        assert_eq!("md5".parse::<DigestKind>().unwrap(), DigestKind::Md5);
        assert_eq!("BLAKE3".parse::<DigestKind>().unwrap(), DigestKind::Blake3);
        assert!("sha1".parse::<DigestKind>().is_err());
        assert_eq!(DigestKind::Blake3.generator().name(), "blake3");
    }

    #[test]
    fn node_key_serializes_as_plain_string() {
        let key = NodeKey("abc".into());
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"abc\"");
    }
}

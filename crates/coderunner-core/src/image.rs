//! Image reference parsing
//
// Container matching compares base names, so the parse has to tell a tag
// separator apart from a registry port (`localhost:5000/app:1.2`).

use std::fmt;

pub const DEFAULT_TAG: &str = "latest";

/// A parsed `[registry[:port]/]name[:tag][@digest]` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    raw: String,
    base: String,
    tag: Option<String>,
    digest: Option<String>,
}

impl ImageRef {
    pub fn parse(reference: &str) -> Self {
        let reference = reference.trim();
        let (without_digest, digest) = match reference.split_once('@') {
            Some((name, digest)) => (name, Some(digest.to_string())),
            None => (reference, None),
        };

        let last_slash = without_digest.rfind('/');
        let (base, tag) = match without_digest.rfind(':') {
            Some(colon) if last_slash.map_or(true, |slash| colon > slash) => (
                &without_digest[..colon],
                Some(without_digest[colon + 1..].to_string()),
            ),
            _ => (without_digest, None),
        };

        Self {
            raw: reference.to_string(),
            base: base.to_string(),
            tag: tag.filter(|t| !t.is_empty()),
            digest,
        }
    }

    /// The reference with tag and digest removed.
    pub fn base_name(&self) -> &str {
        &self.base
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// Tag to request when pulling. A digest wins over a tag.
    pub fn pull_tag(&self) -> &str {
        self.digest
            .as_deref()
            .or(self.tag.as_deref())
            .unwrap_or(DEFAULT_TAG)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn same_base(&self, other: &str) -> bool {
        ImageRef::parse(other).base == self.base
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

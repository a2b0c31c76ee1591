use std::fmt;

use sha2::{Digest as _, Sha256};

use crate::crypto::types::DIGEST_LEN;

/// SHA-256 digest of the canonical signed headers.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct HeaderDigest([u8; DIGEST_LEN]);

impl HeaderDigest {
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for HeaderDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for HeaderDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HeaderDigest({})", self.to_hex())
    }
}

impl fmt::Display for HeaderDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Hash a sequence of byte slices as one contiguous input.
#[inline]
pub fn sha256_concat<'a, I>(parts: I) -> [u8; DIGEST_LEN]
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

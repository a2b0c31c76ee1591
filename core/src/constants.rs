//! Protocol constants shared by the key store, cipher, signer and codec.

/// Wire format version written by the codec.
pub const WIRE_VERSION: u8 = 1;

/// Smallest RSA modulus accepted for new key pairs.
pub const MIN_RSA_BITS: usize = 2048;
/// Key size used when the caller does not ask for one.
pub const DEFAULT_RSA_BITS: usize = 2048;
/// Upper sanity bound for generation requests (keygen time grows ~cubically).
pub const MAX_RSA_BITS: usize = 16384;

/// Symmetric key length for the bulk cipher (AES-256).
pub const KEY_LEN_32: usize = 32;
/// AES-GCM nonce length.
pub const NONCE_LEN_12: usize = 12;
/// AES-GCM tag length, appended to the ciphertext.
pub const TAG_LEN: usize = 16;
/// SHA-256 output length; also the header digest length.
pub const DIGEST_LEN: usize = 32;
/// PSS salt length (equal to the hash length).
pub const PSS_SALT_LEN: usize = DIGEST_LEN;

/// Key file naming convention.
pub mod key_files {
    pub const PRIVATE_SUFFIX: &str = "_priv.pem";
    pub const PUBLIC_SUFFIX: &str = "_pub.pem";
    pub const EXTENSION: &str = "pem";
}

/// Defaults for file locations when no configuration is supplied.
pub const DEFAULT_KEY_DIR: &str = "keys";
pub const DEFAULT_REVOCATION_LIST: &str = "crl.json";

/// Canonical header names, in digest order.
pub mod header_names {
    pub const FROM: &str = "From";
    pub const TO: &str = "To";
    pub const SUBJECT: &str = "Subject";
    pub const DATE: &str = "Date";

    pub const SIGNED: [&str; 4] = [FROM, TO, SUBJECT, DATE];
}

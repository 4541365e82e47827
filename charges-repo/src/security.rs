//! Password hashing with a salted, peppered HMAC-SHA256.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use charges_types::{PasswordHasher, PlainTextPassword};

type HmacSha256 = Hmac<Sha256>;

const SALT_LEN: usize = 16;

/// Stores passwords as `salt_hex$digest_hex`, where the digest is
/// HMAC-SHA256 keyed with a server-side pepper over `salt || password`.
pub struct HmacPasswordHasher {
    pepper: Vec<u8>,
}

impl HmacPasswordHasher {
    pub fn new(pepper: impl AsRef<[u8]>) -> Self {
        Self {
            pepper: pepper.as_ref().to_vec(),
        }
    }

    fn digest(&self, salt: &[u8], password: &str) -> Vec<u8> {
        // HMAC accepts keys of any length, so this cannot fail.
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.pepper)
            .expect("HMAC can take key of any size");
        mac.update(salt);
        mac.update(password.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

impl PasswordHasher for HmacPasswordHasher {
    fn hash(&self, password: &PlainTextPassword) -> String {
        let mut salt = [0u8; SALT_LEN];
        rand::rng().fill_bytes(&mut salt);
        let digest = self.digest(&salt, password.expose());
        format!("{}${}", hex::encode(salt), hex::encode(digest))
    }

    /// Constant-time comparison against a stored `salt$digest` value.
    fn verify(&self, password: &PlainTextPassword, stored: &str) -> bool {
        let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
            return false;
        };
        let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(digest_hex)) else {
            return false;
        };
        let actual = self.digest(&salt, password.expose());
        actual.as_slice().ct_eq(expected.as_slice()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn password(raw: &str) -> PlainTextPassword {
        PlainTextPassword::new(raw).unwrap()
    }

    #[test]
    fn test_hash_format() {
        let hasher = HmacPasswordHasher::new("pepper");
        let hash = hasher.hash(&password("s3cretpass"));

        let (salt, digest) = hash.split_once('$').unwrap();
        assert_eq!(salt.len(), SALT_LEN * 2);
        assert_eq!(digest.len(), 64);
        assert!(!hash.contains("s3cretpass"));
    }

    #[test]
    fn test_salts_differ() {
        let hasher = HmacPasswordHasher::new("pepper");
        let pw = password("s3cretpass");
        assert_ne!(hasher.hash(&pw), hasher.hash(&pw));
    }

    #[test]
    fn test_verify() {
        let hasher = HmacPasswordHasher::new("pepper");
        let stored = hasher.hash(&password("s3cretpass"));

        assert!(hasher.verify(&password("s3cretpass"), &stored));
        assert!(!hasher.verify(&password("wrongpass1"), &stored));
        assert!(!HmacPasswordHasher::new("other").verify(&password("s3cretpass"), &stored));
    }

    #[test]
    fn test_verify_malformed() {
        let hasher = HmacPasswordHasher::new("pepper");
        assert!(!hasher.verify(&password("s3cretpass"), "no-separator"));
        assert!(!hasher.verify(&password("s3cretpass"), "zz$zz"));
    }
}

//! Password hashing port.

use crate::domain::PlainTextPassword;

pub trait PasswordHasher: Send + Sync + 'static {
    /// Returns an encoded hash suitable for storage.
    fn hash(&self, password: &PlainTextPassword) -> String;

    fn verify(&self, password: &PlainTextPassword, stored: &str) -> bool;
}

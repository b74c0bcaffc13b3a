//! Cipher Collaborator
//!
//! The store never encrypts anything itself. Sealing and revealing values go
//! through a [`Cipher`] supplied by the host application, which owns the
//! choice of algorithm, key format and IV handling.

/// Symmetric encryption capability injected into the store.
///
/// Implementations must be able to decrypt anything they encrypted given the
/// same secret key and the IV returned by [`Cipher::encrypt`].
pub trait Cipher {
    /// Error reported by the backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generates a fresh secret key of `length` units.
    fn generate_secret_key(&self, length: usize) -> Result<String, Self::Error>;

    /// Encrypts `plaintext`, returning the ciphertext and the IV used.
    fn encrypt(&self, plaintext: &str, secret_key: &str) -> Result<(String, Vec<u8>), Self::Error>;

    /// Decrypts `ciphertext` back to the original plaintext.
    fn decrypt(&self, ciphertext: &str, secret_key: &str, iv: &[u8]) -> Result<String, Self::Error>;
}

impl<C: Cipher + ?Sized> Cipher for &C {
    type Error = C::Error;

    fn generate_secret_key(&self, length: usize) -> Result<String, Self::Error> {
        (**self).generate_secret_key(length)
    }

    fn encrypt(&self, plaintext: &str, secret_key: &str) -> Result<(String, Vec<u8>), Self::Error> {
        (**self).encrypt(plaintext, secret_key)
    }

    fn decrypt(&self, ciphertext: &str, secret_key: &str, iv: &[u8]) -> Result<String, Self::Error> {
        (**self).decrypt(ciphertext, secret_key, iv)
    }
}

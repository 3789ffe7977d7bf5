use crate::error::{CertError, Result};
use rsa::RsaPrivateKey;
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey, LineEnding};
use rsa::pkcs8::DecodePrivateKey;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Modulus size of every host key we generate.
pub const RSA_KEY_BITS: usize = 2048;

/// RSA key pair backing a host certificate request.
#[derive(Clone)]
pub struct HostKey {
    inner: RsaPrivateKey,
}

impl HostKey {
    /// Generate a fresh 2048-bit RSA key (public exponent 65537).
    pub fn generate() -> Result<Self> {
        let mut rng = rand::thread_rng();
        let inner = RsaPrivateKey::new(&mut rng, RSA_KEY_BITS)?;
        Ok(Self { inner })
    }

    /// Load a key from PEM, accepting both PKCS#1 and PKCS#8 encodings.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let inner = RsaPrivateKey::from_pkcs1_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
            .map_err(|e| CertError::InvalidKey(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Unencrypted PKCS#1 ("RSA PRIVATE KEY") PEM.
    pub fn to_pem(&self) -> Result<String> {
        let pem = self.inner.to_pkcs1_pem(LineEnding::LF)?;
        Ok(pem.as_str().to_owned())
    }

    /// Write the key to `path`, readable by the owner only.
    ///
    /// The file must not exist yet.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let pem = self.inner.to_pkcs1_pem(LineEnding::LF)?;

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path.as_ref())?;
        file.write_all(pem.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }

    pub fn rsa(&self) -> &RsaPrivateKey {
        &self.inner
    }
}

impl fmt::Debug for HostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostKey")
            .field("bits", &RSA_KEY_BITS)
            .finish_non_exhaustive()
    }
}

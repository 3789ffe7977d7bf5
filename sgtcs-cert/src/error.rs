use thiserror::Error;

#[derive(Error, Debug)]
pub enum CertError {
    #[error("RSA error: {0}")]
    Rsa(#[from] rsa::Error),
    #[error("PKCS#1 encoding error: {0}")]
    Pkcs1(#[from] rsa::pkcs1::Error),
    #[error("DER error: {0}")]
    Der(#[from] x509_cert::der::Error),
    #[error("CSR builder error: {0}")]
    Builder(#[from] x509_cert::builder::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Invalid DNS name: {0:?}")]
    InvalidName(String),
    #[error("Invalid certificate: {0}")]
    InvalidCertificate(String),
}

pub type Result<T> = std::result::Result<T, CertError>;

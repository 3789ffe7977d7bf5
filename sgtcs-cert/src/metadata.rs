use crate::error::{CertError, Result};
use sha2::{Digest, Sha256};
use x509_parser::extensions::GeneralName;

/// Human-oriented facts about an issued certificate.
#[derive(Debug, Clone)]
pub struct CertMetadata {
    pub subject: String,
    pub issuer: String,
    pub serial_number: String,
    pub fingerprint_sha256: String,
    pub not_after: time::OffsetDateTime,
    pub dns_names: Vec<String>,
    /// Number of CERTIFICATE blocks in the PEM bundle the summary was taken from.
    pub chain_len: usize,
}

impl CertMetadata {
    /// Summarize the first certificate of a PEM bundle.
    pub fn from_pem(pem_text: &str) -> Result<Self> {
        let blocks = ::pem::parse_many(pem_text)
            .map_err(|e| CertError::InvalidCertificate(format!("PEM parse error: {}", e)))?;
        let certs: Vec<_> = blocks.iter().filter(|p| p.tag() == "CERTIFICATE").collect();

        let leaf = certs
            .first()
            .ok_or_else(|| CertError::InvalidCertificate("no CERTIFICATE block".into()))?;

        let mut metadata = Self::from_der(leaf.contents())?;
        metadata.chain_len = certs.len();
        Ok(metadata)
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        let mut hasher = Sha256::new();
        hasher.update(der);
        let fingerprint_sha256 = hex::encode(hasher.finalize());

        let (_, x509) = x509_parser::parse_x509_certificate(der)
            .map_err(|e| CertError::InvalidCertificate(format!("X509 parse error: {}", e)))?;

        let dns_names = match x509.subject_alternative_name() {
            Ok(Some(san)) => san
                .value
                .general_names
                .iter()
                .filter_map(|name| match name {
                    GeneralName::DNSName(dns) => Some(dns.to_string()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            subject: x509.subject().to_string(),
            issuer: x509.issuer().to_string(),
            serial_number: x509.tbs_certificate.serial.to_str_radix(16),
            fingerprint_sha256,
            not_after: x509.validity().not_after.to_datetime(),
            dns_names,
            chain_len: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_self_signed() {
        let certified = rcgen::generate_simple_self_signed(vec![
            "foo.example.org".to_string(),
            "bar.example.org".to_string(),
        ])
        .unwrap();
        let pem = certified.cert.pem();

        let metadata = CertMetadata::from_pem(&pem).expect("summary");
        assert_eq!(metadata.dns_names, vec!["foo.example.org", "bar.example.org"]);
        assert_eq!(metadata.fingerprint_sha256.len(), 64);
        assert_eq!(metadata.chain_len, 1);
    }

    #[test]
    fn test_counts_bundle_and_uses_leaf() {
        let leaf = rcgen::generate_simple_self_signed(vec!["leaf.example.org".into()]).unwrap();
        let other = rcgen::generate_simple_self_signed(vec!["other.example.org".into()]).unwrap();
        let bundle = format!("{}{}", leaf.cert.pem(), other.cert.pem());

        let metadata = CertMetadata::from_pem(&bundle).expect("summary");
        assert_eq!(metadata.chain_len, 2);
        assert_eq!(metadata.dns_names, vec!["leaf.example.org"]);
    }

    #[test]
    fn test_rejects_non_certificate_text() {
        assert!(CertMetadata::from_pem("not a certificate").is_err());
        let csr_only = "-----BEGIN CERTIFICATE REQUEST-----\nAAAA\n-----END CERTIFICATE REQUEST-----\n";
        assert!(CertMetadata::from_pem(csr_only).is_err());
    }
}

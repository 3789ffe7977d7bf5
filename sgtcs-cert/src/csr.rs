use crate::error::{CertError, Result};
use crate::key::HostKey;
use crate::subject::SubjectTemplate;
use rsa::pkcs1v15::{Signature, SigningKey};
use sha2::Sha256;
use x509_cert::builder::{Builder, RequestBuilder};
use x509_cert::der::asn1::Ia5String;
use x509_cert::der::pem::LineEnding;
use x509_cert::der::{Encode, EncodePem};
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::ext::pkix::{BasicConstraints, KeyUsage, KeyUsages, SubjectAltName};

/// A signed PKCS#10 certificate signing request.
#[derive(Clone, Debug)]
pub struct Csr {
    pem: String,
    der: Vec<u8>,
    subject_alt_names: Vec<String>,
}

impl Csr {
    pub fn pem(&self) -> &str {
        &self.pem
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// DNS names carried in the subjectAltName extension, in request order.
    pub fn subject_alt_names(&self) -> &[String] {
        &self.subject_alt_names
    }
}

/// The hostname followed by every alternate name, first occurrence wins.
pub fn san_list(hostname: &str, altnames: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(altnames.len() + 1);
    for name in std::iter::once(hostname).chain(altnames.iter().map(String::as_str)) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Longest DNS name accepted, in octets.
pub const MAX_DNS_NAME_LEN: usize = 253;

/// Check that `name` is a DNS host name: dot-separated labels of ASCII
/// letters, digits and hyphens, no label starting or ending with a hyphen.
/// A single leading `*.` wildcard label is allowed.
pub fn validate_dns_name(name: &str) -> Result<()> {
    let invalid = || CertError::InvalidName(name.to_string());

    let labels = name.strip_prefix("*.").unwrap_or(name);
    if labels.is_empty() || name.len() > MAX_DNS_NAME_LEN {
        return Err(invalid());
    }
    for label in labels.split('.') {
        let well_formed = !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-');
        if !well_formed {
            return Err(invalid());
        }
    }
    Ok(())
}

/// [`san_list`] after checking every name with [`validate_dns_name`].
pub fn checked_san_list(hostname: &str, altnames: &[String]) -> Result<Vec<String>> {
    let names = san_list(hostname, altnames);
    for name in &names {
        validate_dns_name(name)?;
    }
    Ok(names)
}

/// Build and sign (RSA PKCS#1 v1.5 with SHA-256) a leaf CSR for `hostname`.
///
/// The request carries three extensions: subjectAltName with
/// [`san_list`]`(hostname, altnames)`, basicConstraints `CA:FALSE`, and
/// keyUsage limited to digitalSignature, nonRepudiation and keyEncipherment.
/// Output is deterministic for a given key and set of names.
pub fn build_csr(
    key: &HostKey,
    subject: &SubjectTemplate,
    hostname: &str,
    altnames: &[String],
) -> Result<Csr> {
    let names = checked_san_list(hostname, altnames)?;

    let general_names = names
        .iter()
        .map(|name| {
            Ia5String::new(name)
                .map(GeneralName::DnsName)
                .map_err(|_| CertError::InvalidName(name.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    let signer = SigningKey::<Sha256>::new(key.rsa().clone());
    let mut builder = RequestBuilder::new(subject.to_name(hostname)?, &signer)?;
    builder.add_extension(&SubjectAltName(general_names))?;
    builder.add_extension(&BasicConstraints {
        ca: false,
        path_len_constraint: None,
    })?;
    builder.add_extension(&KeyUsage(
        KeyUsages::DigitalSignature | KeyUsages::NonRepudiation | KeyUsages::KeyEncipherment,
    ))?;

    let request = builder.build::<Signature>()?;
    let der = request.to_der()?;
    let pem = request.to_pem(LineEnding::LF)?;

    tracing::debug!(hostname, sans = names.len(), "built certificate request");

    Ok(Csr {
        pem,
        der,
        subject_alt_names: names,
    })
}

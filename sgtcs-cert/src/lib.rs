//! Key and certificate-request plumbing for host certificate enrollment.
//!
//! Everything here is local: RSA key generation, the organizational subject
//! template, PKCS#10 request construction, and reading back what the
//! certificate service eventually issues.

mod csr;
mod error;
mod key;
mod metadata;
mod subject;

pub use csr::{
    Csr, MAX_DNS_NAME_LEN, build_csr, checked_san_list, san_list, validate_dns_name,
};
pub use error::{CertError, Result};
pub use key::{HostKey, RSA_KEY_BITS};
pub use metadata::CertMetadata;
pub use subject::{
    OID_COMMON_NAME, OID_COUNTRY_NAME, OID_DOMAIN_COMPONENT, OID_LOCALITY_NAME,
    OID_ORGANIZATION_NAME, SubjectTemplate,
};

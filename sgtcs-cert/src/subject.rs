use crate::error::Result;
use serde::{Deserialize, Serialize};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::der::asn1::{Any, Ia5StringRef, PrintableStringRef, SetOfVec, Utf8StringRef};
use x509_cert::der::oid::ObjectIdentifier;
use x509_cert::name::{Name, RdnSequence, RelativeDistinguishedName};

// Attribute types used in the subject, see RFC 4519
pub const OID_DOMAIN_COMPONENT: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("0.9.2342.19200300.100.1.25");
pub const OID_COUNTRY_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");
pub const OID_LOCALITY_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.7");
pub const OID_ORGANIZATION_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");
pub const OID_COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");

/// Fixed organizational part of every requested subject.
///
/// The common name is the only per-request attribute; everything else comes
/// from here. RDNs are emitted in field order: domain components (in the
/// order listed), country, locality, organization, then the common name.
/// Empty values are left out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectTemplate {
    pub domain_components: Vec<String>,
    pub country: String,
    pub locality: String,
    pub organization: String,
}

impl Default for SubjectTemplate {
    fn default() -> Self {
        Self {
            domain_components: vec!["org".into(), "terena".into(), "tcs".into()],
            country: "NL".to_string(),
            locality: "Amsterdam".to_string(),
            organization: "Nikhef".to_string(),
        }
    }
}

impl SubjectTemplate {
    /// Build the full subject name for `common_name`.
    pub fn to_name(&self, common_name: &str) -> Result<Name> {
        let mut rdns = Vec::with_capacity(self.domain_components.len() + 4);

        for dc in &self.domain_components {
            rdns.push(rdn(OID_DOMAIN_COMPONENT, Any::encode_from(&Ia5StringRef::new(dc)?)?)?);
        }
        if !self.country.is_empty() {
            rdns.push(rdn(
                OID_COUNTRY_NAME,
                Any::encode_from(&PrintableStringRef::new(&self.country)?)?,
            )?);
        }
        if !self.locality.is_empty() {
            rdns.push(rdn(OID_LOCALITY_NAME, utf8(&self.locality)?)?);
        }
        if !self.organization.is_empty() {
            rdns.push(rdn(OID_ORGANIZATION_NAME, utf8(&self.organization)?)?);
        }
        rdns.push(rdn(OID_COMMON_NAME, utf8(common_name)?)?);

        Ok(RdnSequence(rdns))
    }
}

fn utf8(value: &str) -> Result<Any> {
    Ok(Any::encode_from(&Utf8StringRef::new(value)?)?)
}

fn rdn(oid: ObjectIdentifier, value: Any) -> Result<RelativeDistinguishedName> {
    let set = SetOfVec::try_from(vec![AttributeTypeAndValue { oid, value }])?;
    Ok(RelativeDistinguishedName(set))
}

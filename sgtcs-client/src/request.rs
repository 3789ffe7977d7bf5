//! Builds the key, CSR and enrollment payload for one hostname

use crate::profile::{ProfileError, resolve_term};
use crate::types::{CertificateProfile, EnrollmentRequest, OptionalField};
use crate::ClientResult;
use sgtcs_cert::{Csr, HostKey, SubjectTemplate, build_csr, san_list};
use sysinfo::System;

/// Fields of the enrollment body that do not vary per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    pub organization_id: u64,
    pub subject: SubjectTemplate,
    pub optional_fields: Vec<OptionalField>,
    pub comments: String,
}

impl RequestConfig {
    pub fn new(organization_id: u64) -> Self {
        Self {
            organization_id,
            subject: SubjectTemplate::default(),
            optional_fields: default_optional_fields(),
            comments: default_comments(),
        }
    }

    pub fn with_subject(mut self, subject: SubjectTemplate) -> Self {
        self.subject = subject;
        self
    }

    pub fn with_optional_fields(mut self, fields: Vec<OptionalField>) -> Self {
        self.optional_fields = fields;
        self
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }
}

/// Locality/state/postal fields sent with every enrollment.
pub fn default_optional_fields() -> Vec<OptionalField> {
    vec![
        OptionalField::new("localityName", "Amsterdam"),
        OptionalField::new("postalCode", ""),
        OptionalField::new("stateOrProvinceName", ""),
    ]
}

/// Enrollment comment naming the machine the request came from.
pub fn default_comments() -> String {
    let host = System::host_name().unwrap_or_else(|| "unknown host".to_string());
    format!("Requested via sgtcs on {}", host)
}

#[derive(Debug, Clone)]
pub struct RequestBuilder {
    config: RequestConfig,
}

impl RequestBuilder {
    pub fn new(config: RequestConfig) -> Self {
        Self { config }
    }

    pub fn generate_key(&self) -> ClientResult<HostKey> {
        Ok(HostKey::generate()?)
    }

    pub fn build_csr(&self, key: &HostKey, hostname: &str, altnames: &[String]) -> ClientResult<Csr> {
        Ok(build_csr(key, &self.config.subject, hostname, altnames)?)
    }

    /// Shape the enrollment body; `term` falls back to the profile's first term.
    pub fn build_enrollment_payload(
        &self,
        csr: &Csr,
        profile: &CertificateProfile,
        term: Option<u32>,
        hostname: &str,
        altnames: &[String],
    ) -> Result<EnrollmentRequest, ProfileError> {
        let term = resolve_term(profile, term)?;

        Ok(EnrollmentRequest {
            org_id: self.config.organization_id,
            csr: csr.pem().trim_end().to_string(),
            subj_alt_names: san_list(hostname, altnames).join(","),
            cert_type: profile.id,
            number_servers: 1,
            server_type: -1,
            term,
            optional_fields: self.config.optional_fields.clone(),
            comments: self.config.comments.clone(),
            external_requester: String::new(),
        })
    }
}

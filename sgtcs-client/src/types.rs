//! Wire types of the certificate-management API

use crate::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A certificate profile ("type") offered by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateProfile {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Allowed validity periods in days, in service order.
    #[serde(default)]
    pub terms: Vec<u32>,
}

impl CertificateProfile {
    /// The term used when none is requested explicitly.
    pub fn default_term(&self) -> Option<u32> {
        self.terms.first().copied()
    }
}

impl fmt::Display for CertificateProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = self.terms.iter().map(u32::to_string).collect();
        write!(
            f,
            "{}:\t{}\t{} (terms: {})",
            self.id,
            self.name,
            self.description,
            terms.join(",")
        )
    }
}

/// A `{name, value}` pair in the enrollment `optionalFields` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionalField {
    pub name: String,
    pub value: String,
}

impl OptionalField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Body of `POST ssl/v1/enroll`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    pub org_id: u64,
    pub csr: String,
    /// Comma-joined DNS names, hostname first.
    pub subj_alt_names: String,
    pub cert_type: u64,
    pub number_servers: u32,
    pub server_type: i32,
    pub term: u32,
    pub optional_fields: Vec<OptionalField>,
    pub comments: String,
    pub external_requester: String,
}

/// Body returned by a successful enrollment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollResponse {
    /// Usually a number, kept loose because it is opaque to us.
    pub ssl_id: Option<serde_json::Value>,
    #[serde(default)]
    pub renew_id: Option<String>,
}

impl EnrollResponse {
    /// Extract the identifier used later to collect the certificate.
    pub fn tracking_record(&self) -> ClientResult<TrackingRecord> {
        let id = match &self.ssl_id {
            Some(serde_json::Value::Number(n)) => n.to_string(),
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(other) => {
                return Err(ClientError::InvalidResponse(format!(
                    "unexpected sslId value: {}",
                    other
                )));
            }
            None => {
                return Err(ClientError::InvalidResponse(
                    "enrollment response has no sslId".to_string(),
                ));
            }
        };
        Ok(TrackingRecord::new(id))
    }
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub record: TrackingRecord,
    pub renew_id: Option<String>,
}

/// Error body the service attaches to non-success responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Opaque request identifier handed out by the enrollment call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackingRecord(String);

impl TrackingRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_decodes_without_description() {
        let profile: CertificateProfile =
            serde_json::from_str(r#"{"id": 8586, "name": "02 GÉANT Wildcard SSL", "terms": [365]}"#)
                .unwrap();
        assert_eq!(profile.description, "");
        assert_eq!(profile.default_term(), Some(365));
    }

    #[test]
    fn test_profile_display_line() {
        let profile = CertificateProfile {
            id: 8582,
            name: "04 GÉANT IGTF Multi-Domain".into(),
            description: "grid".into(),
            terms: vec![395, 365],
        };
        assert_eq!(
            profile.to_string(),
            "8582:\t04 GÉANT IGTF Multi-Domain\tgrid (terms: 395,365)"
        );
    }

    #[test]
    fn test_enrollment_request_wire_names() {
        let request = EnrollmentRequest {
            org_id: 11358,
            csr: "CSR".into(),
            subj_alt_names: "a.example.org,b.example.org".into(),
            cert_type: 8582,
            number_servers: 1,
            server_type: -1,
            term: 395,
            optional_fields: vec![OptionalField::new("localityName", "Amsterdam")],
            comments: "hi".into(),
            external_requester: String::new(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["orgId"], 11358);
        assert_eq!(json["subjAltNames"], "a.example.org,b.example.org");
        assert_eq!(json["certType"], 8582);
        assert_eq!(json["numberServers"], 1);
        assert_eq!(json["serverType"], -1);
        assert_eq!(json["optionalFields"][0]["name"], "localityName");
        assert_eq!(json["externalRequester"], "");
    }

    #[test]
    fn test_tracking_record_from_number_and_string() {
        let numeric: EnrollResponse =
            serde_json::from_str(r#"{"renewId":"SdibUBp-loQxlarC3XWr","sslId":1757496}"#).unwrap();
        assert_eq!(numeric.tracking_record().unwrap().as_str(), "1757496");
        assert_eq!(numeric.renew_id.as_deref(), Some("SdibUBp-loQxlarC3XWr"));

        let text: EnrollResponse = serde_json::from_str(r#"{"sslId":" abc "}"#).unwrap();
        assert_eq!(text.tracking_record().unwrap().as_str(), "abc");
    }

    #[test]
    fn test_tracking_record_missing_is_invalid_response() {
        let empty: EnrollResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            empty.tracking_record(),
            Err(ClientError::InvalidResponse(_))
        ));

        let null: EnrollResponse = serde_json::from_str(r#"{"sslId": null}"#).unwrap();
        assert!(null.tracking_record().is_err());
    }
}

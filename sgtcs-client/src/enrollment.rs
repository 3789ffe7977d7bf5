//! Enrollment store: submits requests, collects certificates, and keeps the
//! on-disk bookkeeping in step with the service.

use crate::storage::StorageLayout;
use crate::types::{CertificateProfile, EnrollmentRequest, Submission, TrackingRecord};
use crate::{ClientConfig, ClientResult, HttpClient};

#[derive(Debug, Clone)]
pub struct EnrollmentStore {
    http: HttpClient,
    organization_id: u64,
}

impl EnrollmentStore {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
            organization_id: config.organization_id,
        })
    }

    /// Full profile catalog of the configured organization
    pub async fn list_profiles(&self) -> ClientResult<Vec<CertificateProfile>> {
        let profiles = self.http.types(self.organization_id).await?;
        tracing::debug!(count = profiles.len(), "fetched profile catalog");
        Ok(profiles)
    }

    /// Enroll `payload` and record the returned id under `layout`
    pub async fn submit(
        &self,
        layout: &StorageLayout,
        payload: &EnrollmentRequest,
    ) -> ClientResult<Submission> {
        let response = self.http.enroll(payload).await?;
        let record = response.tracking_record()?;

        layout.write_tracking_record(&record)?;
        tracing::info!(
            ssl_id = %record,
            renew_id = response.renew_id.as_deref().unwrap_or(""),
            path = %layout.request_id_path().display(),
            "request submitted"
        );
        Ok(Submission {
            record,
            renew_id: response.renew_id,
        })
    }

    /// Collect the certificate for the request recorded under `layout`.
    ///
    /// The tracking record is read before anything goes over the wire, so a
    /// missing record fails locally.
    pub async fn retrieve(&self, layout: &StorageLayout) -> ClientResult<String> {
        layout.open()?;
        let record = layout.read_tracking_record()?;
        self.retrieve_record(layout, &record).await
    }

    /// Collect the certificate for `record` and write it under `layout`
    pub async fn retrieve_record(
        &self,
        layout: &StorageLayout,
        record: &TrackingRecord,
    ) -> ClientResult<String> {
        let pem = self.http.collect(record).await?;
        layout.write_certificate(&pem)?;
        tracing::info!(
            ssl_id = %record,
            path = %layout.cert_path().display(),
            "certificate retrieved"
        );
        Ok(pem)
    }
}

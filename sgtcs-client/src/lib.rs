//! sgtcs client - talks to the certificate-management REST API
//!
//! Provides the HTTP client for the profile catalog, enrollment and
//! collection endpoints, the request builder that shapes enrollment bodies,
//! and the on-disk bookkeeping of submitted requests.

pub mod config;
pub mod enrollment;
pub mod error;
pub mod http;
pub mod profile;
pub mod request;
pub mod storage;
pub mod types;

pub use config::ClientConfig;
pub use enrollment::EnrollmentStore;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use profile::{ProfileError, normalize_profile_name, render_catalog, select_profile};
pub use request::{RequestBuilder, RequestConfig};
pub use storage::{EnrollmentState, StorageError, StorageLayout};
pub use types::{
    CertificateProfile, EnrollResponse, EnrollmentRequest, OptionalField, Submission,
    TrackingRecord,
};

//! Settings: built-in defaults, then an optional JSON file, then options
//! (command line or environment)

use crate::cli::GlobalOptions;
use crate::error::CliError;
use serde::{Deserialize, Serialize};
use sgtcs_cert::SubjectTemplate;
use sgtcs_client::config::{DEFAULT_BASE_URL, DEFAULT_CUSTOMER, DEFAULT_ORGANIZATION_ID};
use sgtcs_client::request::default_optional_fields;
use sgtcs_client::{CertificateProfile, ClientConfig, OptionalField, RequestConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// Profile asked for when `--type` is not given.
pub const DEFAULT_PROFILE: &str = "igtf";

/// HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub customer: String,
    pub organization_id: u64,
    pub subject: SubjectTemplate,
    pub optional_fields: Vec<OptionalField>,
    pub default_profile: String,
    pub timeout_secs: u64,
    /// Offline catalog, consulted instead of the service in dry-run mode.
    pub profiles: Vec<CertificateProfile>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            customer: DEFAULT_CUSTOMER.to_string(),
            organization_id: DEFAULT_ORGANIZATION_ID,
            subject: SubjectTemplate::default(),
            optional_fields: default_optional_fields(),
            default_profile: DEFAULT_PROFILE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            profiles: Vec::new(),
        }
    }
}

impl Settings {
    /// Defaults, overlaid with the JSON file at `path` if one is given.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path).map_err(|source| CliError::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&text).map_err(|source| CliError::SettingsParse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded settings file");
        Ok(settings)
    }

    /// Apply command-line/environment overrides.
    pub fn apply(&mut self, options: &GlobalOptions) {
        if let Some(base_url) = &options.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(customer) = &options.customer {
            self.customer = customer.clone();
        }
        if let Some(org_id) = options.org_id {
            self.organization_id = org_id;
        }
    }
}

/// Everything a command needs, resolved once from settings and options.
#[derive(Clone)]
pub struct Context {
    pub settings: Settings,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Directory the `<hostname>/<subdir>` tree lives under.
    pub base_dir: PathBuf,
    pub subdir: String,
    pub profile_query: String,
    pub term: Option<u32>,
    pub dry_run: bool,
}

impl Context {
    /// Resolve settings and options, storing files under `base_dir`.
    pub fn resolve(options: &GlobalOptions, base_dir: impl Into<PathBuf>) -> Result<Self, CliError> {
        let mut settings = Settings::load(options.config.as_deref())?;
        settings.apply(options);

        let subdir = match &options.subdir {
            Some(subdir) => subdir.clone(),
            None => default_subdir(),
        };
        validate_subdir(&subdir)?;

        let profile_query = options
            .profile_type
            .clone()
            .unwrap_or_else(|| settings.default_profile.clone());

        Ok(Self {
            username: non_empty(options.username.as_deref()),
            password: non_empty(options.password.as_deref()),
            base_dir: base_dir.into(),
            subdir,
            profile_query,
            term: options.term,
            dry_run: options.no_act,
            settings,
        })
    }

    /// Client configuration; fails when credentials are missing.
    pub fn client_config(&self) -> Result<ClientConfig, CliError> {
        let username = self.username.as_deref().ok_or_else(|| {
            CliError::Config("no username given (use --username or TCSAPIUSER)".to_string())
        })?;
        let password = self.password.as_deref().ok_or_else(|| {
            CliError::Config("no password given (use --password or TCSAPIKEY)".to_string())
        })?;

        Ok(ClientConfig::new(self.settings.base_url.clone())
            .with_customer(self.settings.customer.clone())
            .with_credentials(username, password)
            .with_organization_id(self.settings.organization_id)
            .with_timeout(self.settings.timeout_secs))
    }

    pub fn request_config(&self) -> RequestConfig {
        RequestConfig::new(self.settings.organization_id)
            .with_subject(self.settings.subject.clone())
            .with_optional_fields(self.settings.optional_fields.clone())
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("settings", &self.settings)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("base_dir", &self.base_dir)
            .field("subdir", &self.subdir)
            .field("profile_query", &self.profile_query)
            .field("term", &self.term)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Current year, the default period directory.
pub fn default_subdir() -> String {
    time::OffsetDateTime::now_utc().year().to_string()
}

fn validate_subdir(subdir: &str) -> Result<(), CliError> {
    let path = Path::new(subdir);
    let single_component = path.components().count() == 1
        && matches!(path.components().next(), Some(std::path::Component::Normal(_)));
    if subdir.is_empty() || !single_component {
        return Err(CliError::Config(format!(
            "subdir {:?} must be a single directory name",
            subdir
        )));
    }
    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

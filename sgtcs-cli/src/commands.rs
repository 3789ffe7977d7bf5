//! Command orchestration for `new`, `retrieve` and `list-types`

use crate::cli::Command;
use crate::config::Context;
use crate::error::CliError;
use sgtcs_cert::{CertMetadata, checked_san_list, validate_dns_name};
use sgtcs_client::{
    CertificateProfile, EnrollmentState, EnrollmentStore, RequestBuilder, StorageLayout,
    render_catalog, select_profile,
};
use std::io::Write;

/// What a command produced, for the caller to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Request submitted and its id recorded
    Submitted {
        ssl_id: String,
        renew_id: Option<String>,
    },
    /// Key and CSR written, nothing sent
    Prepared,
    /// Certificate collected and written
    Retrieved,
    /// Retrieval skipped in dry-run mode
    Skipped,
    /// Catalog listing, one line per profile
    Catalog(String),
}

impl Outcome {
    /// Write the user-facing part of the outcome to `out`.
    pub fn print(&self, out: &mut impl Write) -> std::io::Result<()> {
        match self {
            Outcome::Submitted { ssl_id, renew_id } => {
                writeln!(out, "sslId: {}", ssl_id)?;
                if let Some(renew_id) = renew_id {
                    writeln!(out, "renewId: {}", renew_id)?;
                }
                Ok(())
            }
            Outcome::Catalog(text) => out.write_all(text.as_bytes()),
            Outcome::Prepared | Outcome::Retrieved | Outcome::Skipped => Ok(()),
        }
    }
}

pub async fn run(command: &Command, ctx: &Context) -> Result<Outcome, CliError> {
    match command {
        Command::New {
            hostname,
            althostnames,
        } => new_request(ctx, hostname, althostnames).await,
        Command::Retrieve { hostname } => retrieve(ctx, hostname).await,
        Command::ListTypes => list_types(ctx).await,
    }
}

fn layout(ctx: &Context, hostname: &str) -> StorageLayout {
    StorageLayout::new(&ctx.base_dir, hostname, &ctx.subdir)
}

/// Service connection, or none in dry-run mode.
fn connect(ctx: &Context) -> Result<Option<EnrollmentStore>, CliError> {
    if ctx.dry_run {
        return Ok(None);
    }
    Ok(Some(EnrollmentStore::new(&ctx.client_config()?)?))
}

/// Profile catalog: the service's, or the offline one when not connected.
async fn catalog(
    ctx: &Context,
    store: Option<&EnrollmentStore>,
) -> Result<Option<Vec<CertificateProfile>>, CliError> {
    match store {
        Some(store) => Ok(Some(store.list_profiles().await?)),
        None if ctx.settings.profiles.is_empty() => Ok(None),
        None => Ok(Some(ctx.settings.profiles.clone())),
    }
}

async fn new_request(
    ctx: &Context,
    hostname: &str,
    althostnames: &[String],
) -> Result<Outcome, CliError> {
    // Names and profile are settled before anything touches the disk
    let names = checked_san_list(hostname, althostnames)?;
    let store = connect(ctx)?;

    let profile = match catalog(ctx, store.as_ref()).await? {
        Some(profiles) => {
            let profile = select_profile(&ctx.profile_query, &profiles)?.clone();
            tracing::info!(
                id = profile.id,
                name = %profile.name,
                "selected certificate profile"
            );
            Some(profile)
        }
        None => {
            tracing::warn!(
                query = %ctx.profile_query,
                "dry run without an offline profile catalog; profile not checked"
            );
            None
        }
    };

    let builder = RequestBuilder::new(ctx.request_config());
    let layout = layout(ctx, hostname);
    layout.create()?;

    let key = builder.generate_key()?;
    key.save(layout.key_path())?;
    tracing::info!(path = %layout.key_path().display(), "key written");

    let csr = builder.build_csr(&key, hostname, althostnames)?;
    layout.write_csr(csr.pem())?;
    tracing::info!(
        path = %layout.csr_path().display(),
        subject_alt_names = %names.join(","),
        "request written"
    );

    let payload = match &profile {
        Some(profile) => {
            let payload =
                builder.build_enrollment_payload(&csr, profile, ctx.term, hostname, althostnames)?;
            tracing::info!(cert_type = payload.cert_type, term = payload.term, "enrollment prepared");
            Some(payload)
        }
        None => None,
    };

    match (store, payload) {
        (Some(store), Some(payload)) => {
            let submission = store.submit(&layout, &payload).await?;
            Ok(Outcome::Submitted {
                ssl_id: submission.record.to_string(),
                renew_id: submission.renew_id,
            })
        }
        _ => {
            tracing::warn!(dir = %layout.dir().display(), "dry run; request not submitted");
            Ok(Outcome::Prepared)
        }
    }
}

async fn retrieve(ctx: &Context, hostname: &str) -> Result<Outcome, CliError> {
    validate_dns_name(hostname)?;
    let layout = layout(ctx, hostname);
    layout.open()?;
    let record = layout.read_tracking_record()?;
    if layout.state() == EnrollmentState::Retrieved {
        tracing::info!(
            path = %layout.cert_path().display(),
            "certificate already present; it will be replaced"
        );
    }

    let Some(store) = connect(ctx)? else {
        tracing::warn!(ssl_id = %record, "dry run; certificate not retrieved");
        return Ok(Outcome::Skipped);
    };
    let pem = store.retrieve_record(&layout, &record).await?;

    match CertMetadata::from_pem(&pem) {
        Ok(meta) => tracing::info!(
            subject = %meta.subject,
            serial = %meta.serial_number,
            not_after = %meta.not_after,
            sha256 = %meta.fingerprint_sha256,
            chain = meta.chain_len,
            "certificate summary"
        ),
        Err(e) => tracing::warn!(error = %e, "retrieved certificate could not be parsed"),
    }

    Ok(Outcome::Retrieved)
}

async fn list_types(ctx: &Context) -> Result<Outcome, CliError> {
    let store = connect(ctx)?;
    match catalog(ctx, store.as_ref()).await? {
        Some(profiles) => Ok(Outcome::Catalog(render_catalog(&profiles))),
        None => {
            tracing::warn!("dry run without an offline profile catalog; nothing to list");
            Ok(Outcome::Catalog(String::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submitted_prints_both_ids() {
        let mut out = Vec::new();
        Outcome::Submitted {
            ssl_id: "1757496".into(),
            renew_id: Some("SdibUBp".into()),
        }
        .print(&mut out)
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "sslId: 1757496\nrenewId: SdibUBp\n");
    }

    #[test]
    fn test_quiet_outcomes_print_nothing() {
        for outcome in [Outcome::Prepared, Outcome::Retrieved, Outcome::Skipped] {
            let mut out = Vec::new();
            outcome.print(&mut out).unwrap();
            assert!(out.is_empty());
        }
    }
}

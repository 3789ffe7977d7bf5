//! Profile catalog lookup and request policy

use crate::types::CertificateProfile;
use thiserror::Error;

/// Marker for extended-validation profiles, which are never requested here.
pub const EXTENDED_VALIDATION_MARKER: &str = "EV";

#[derive(Debug, Error)]
pub enum ProfileError {
    /// Nothing in the catalog matched; the catalog is kept so it can be shown.
    #[error("no match found for certificate profile {query:?}")]
    NoMatch {
        query: String,
        catalog: Vec<CertificateProfile>,
    },

    #[error("requesting EV certificates via this tool is disabled (profile {name:?})")]
    ExtendedValidation { name: String },

    #[error("profile {name:?} lists no allowed terms and no --term was given")]
    NoTerm { name: String },
}

/// Lowercase and turn hyphens into spaces.
pub fn normalize_profile_name(name: &str) -> String {
    name.to_lowercase().replace('-', " ")
}

fn is_numeric_query(query: &str) -> bool {
    !query.is_empty() && query.bytes().all(|b| b.is_ascii_digit())
}

/// Find the profile matching `query`.
///
/// An all-digit query matches an id exactly; anything else is normalized with
/// [`normalize_profile_name`] and matched as a substring of the normalized
/// profile names, first hit wins. The match is then checked against the EV
/// policy.
pub fn select_profile<'a>(
    query: &str,
    profiles: &'a [CertificateProfile],
) -> Result<&'a CertificateProfile, ProfileError> {
    let found = if is_numeric_query(query) {
        query
            .parse::<u64>()
            .ok()
            .and_then(|id| profiles.iter().find(|p| p.id == id))
    } else {
        let needle = normalize_profile_name(query);
        profiles
            .iter()
            .find(|p| normalize_profile_name(&p.name).contains(&needle))
    };

    let profile = found.ok_or_else(|| ProfileError::NoMatch {
        query: if is_numeric_query(query) {
            query.to_string()
        } else {
            normalize_profile_name(query)
        },
        catalog: profiles.to_vec(),
    })?;

    ensure_not_extended_validation(profile)?;
    Ok(profile)
}

/// Reject profiles whose name carries the EV marker.
pub fn ensure_not_extended_validation(profile: &CertificateProfile) -> Result<(), ProfileError> {
    if profile.name.contains(EXTENDED_VALIDATION_MARKER) {
        return Err(ProfileError::ExtendedValidation {
            name: profile.name.clone(),
        });
    }
    Ok(())
}

/// Explicit term if given, else the profile's first allowed term.
pub fn resolve_term(profile: &CertificateProfile, requested: Option<u32>) -> Result<u32, ProfileError> {
    match requested {
        Some(term) => {
            if !profile.terms.contains(&term) {
                tracing::warn!(
                    term,
                    profile = %profile.name,
                    allowed = ?profile.terms,
                    "requested term is not listed for this profile"
                );
            }
            Ok(term)
        }
        None => profile.default_term().ok_or_else(|| ProfileError::NoTerm {
            name: profile.name.clone(),
        }),
    }
}

/// One line per profile, as printed by `list-types`.
pub fn render_catalog(profiles: &[CertificateProfile]) -> String {
    profiles.iter().map(|p| format!("{}\n", p)).collect()
}

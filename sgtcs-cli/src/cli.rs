//! Command-line surface

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Request and retrieve host certificates from the TCS certificate service
#[derive(Debug, Parser)]
#[command(name = "sgtcs", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub options: GlobalOptions,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate a key and CSR for <hostname> and submit the request
    New {
        hostname: String,
        /// Additional DNS names for the subjectAltName extension
        althostnames: Vec<String>,
    },
    /// Collect the certificate for an earlier request
    Retrieve { hostname: String },
    /// List the certificate profiles offered to the organization
    ListTypes,
}

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Customer name (customerUri header)
    #[arg(long, global = true, env = "TCS_CUSTOMER")]
    pub customer: Option<String>,

    /// API username
    #[arg(long, global = true, env = "TCSAPIUSER")]
    pub username: Option<String>,

    /// API password
    #[arg(long, global = true, env = "TCSAPIKEY", hide_env_values = true)]
    pub password: Option<String>,

    /// Subdirectory to store files under (default: current year)
    #[arg(long, global = true)]
    pub subdir: Option<String>,

    /// Profile of cert to request (matches either id or name)
    #[arg(long = "type", global = true, value_name = "TYPE")]
    pub profile_type: Option<String>,

    /// Validity period (days)
    #[arg(long, global = true)]
    pub term: Option<u32>,

    /// Don't actually request/retrieve
    #[arg(long = "no-act", visible_alias = "dry-run", global = true)]
    pub no_act: bool,

    /// JSON settings file
    #[arg(long, global = true, env = "SGTCS_CONFIG")]
    pub config: Option<PathBuf>,

    /// API base URL
    #[arg(long, global = true, env = "TCS_BASE_URL")]
    pub base_url: Option<String>,

    /// Organization id
    #[arg(long, global = true, env = "TCS_ORG_ID")]
    pub org_id: Option<u64>,

    /// More logging (-v for debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

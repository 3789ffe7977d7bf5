//! Logging setup
//!
//! Logs go to stderr so stdout only carries command output.

use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `sgtcs=info`, or `sgtcs=debug` with
/// any `-v`.
pub fn init_logger(verbosity: u8) {
    let fallback = match verbosity {
        0 => "sgtcs=info,sgtcs_cli=info,sgtcs_client=info,sgtcs_cert=info",
        _ => "sgtcs=debug,sgtcs_cli=debug,sgtcs_client=debug,sgtcs_cert=debug",
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

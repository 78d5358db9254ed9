//! Log subscriber setup for the `midivault` binary.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "midivault_cli=info,midivault_store=info,midivault_backend_smf=info";

/// Filter used with `--verbose`.
pub const VERBOSE_FILTER: &str =
    "midivault_cli=debug,midivault_store=debug,midivault_backend_smf=debug";

/// Builds the filter: `--verbose` wins, then `RUST_LOG`, then the default.
pub fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new(VERBOSE_FILTER);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Logs go to stderr so command output on
/// stdout stays machine-readable.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

//! Tracing setup shared by both binaries.

use tracing_subscriber::EnvFilter;

/// Directive applied on top of `RUST_LOG`
const DEFAULT_DIRECTIVE: &str = "region_probe=info";

/// Installs a `fmt` subscriber filtered by `RUST_LOG`.
/// Logs go to stderr, stdout is left to the program's own output.
pub fn setup_tracing() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(DEFAULT_DIRECTIVE.parse()?))
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

use anyhow::Context;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Checked before `RUST_LOG`.
pub const LOG_ENV: &str = "LINECAST_LOG";

/// Diagnostics go to stderr; stdout belongs to the relayed lines.
pub fn init_tracing(default_level: Level) -> anyhow::Result<()> {
    // LINECAST_LOG=linecast_core=debug,linecast_console=trace
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str().to_ascii_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("couldn't install the diagnostic logger")
}

/// Logger first, then the panic hook. The hook only logs, so it is left
/// alone when there is no subscriber to log to.
pub fn init(default_level: Level) -> anyhow::Result<()> {
    init_tracing(default_level)?;
    install_panic_hook();
    Ok(())
}

pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(|s| s.as_str()))
            .unwrap_or("<non-string panic payload>");

        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "<unknown>".to_string());

        tracing::error!(%location, %payload, "panic");
    }));
}

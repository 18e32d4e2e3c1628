use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins over the configured filter. Dependencies stay at `warn`
/// unless the filter names them.
pub fn build_env_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(format!("warn,partner_admin={configured}"))
            .unwrap_or_else(|_| EnvFilter::new("warn,partner_admin=info"))
    })
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init_logging(configured: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(configured))
        .with_target(false)
        .try_init();
}


mod dispatcher_tests;
mod locator_tests;

// Initialize tracing for tests; safe to call from every test.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
        )
        .with_test_writer()
        .try_init();
}

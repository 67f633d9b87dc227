pub mod relay;
pub mod specs;
pub mod users;

/// Install a `tracing` subscriber for tests, filtered by `RUST_LOG`. Safe to
/// call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

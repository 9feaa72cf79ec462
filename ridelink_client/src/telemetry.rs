use crate::utils::APP_NAME;

/// Initializes `env_logger`, honouring `RUST_LOG` when set. Calling it more
/// than once is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(format!("{APP_NAME}=info")),
    )
    .try_init();
}

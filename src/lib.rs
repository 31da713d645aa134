pub mod chart;
pub mod context;
pub mod db;
pub mod error;
pub mod prefs;
pub mod stats;

pub use context::AppContext;
pub use db::Database;
pub use error::StoreError;
pub use prefs::PrefStore;

/// Initialize logging for the host shell (reads RUST_LOG env var).
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}

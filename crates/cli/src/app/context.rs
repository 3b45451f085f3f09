use std::path::PathBuf;

/// Resolved, validated run configuration handed to the driver (spec §6).
pub struct AppContext {
    pub quiet: bool,
    pub output_dir: PathBuf,
    pub database_path: PathBuf,
}

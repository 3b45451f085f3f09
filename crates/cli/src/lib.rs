pub mod app;
pub mod cli;
pub mod commands;
pub mod error;

pub fn run() -> Result<(), error::CliError> {
    app::run()
}

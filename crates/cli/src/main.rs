fn main() {
    if let Err(err) = c9rev2git_cli::run() {
        eprintln!("{err}");
        std::process::exit(err.exit_code());
    }
}

//! Binary entrypoint for assfc.

fn main() {
    if let Err(err) = assfc_cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

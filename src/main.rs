//! scim-import entry point
//!
//! Parses arguments and dispatches via `cli::run`. Errors are printed to
//! stderr and mapped to the error's exit code.

use scim_import::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}

//! synthriders-rpc main entrypoint.

use synthriders_rpc::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

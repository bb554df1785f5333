//! Float command-line entry point.

fn main() {
    if let Err(err) = float_lib::cli::run() {
        eprintln!("float: {err}");
        std::process::exit(1);
    }
}

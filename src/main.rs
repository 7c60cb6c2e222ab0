use unisearch::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("[Unisearch] {e}");
        std::process::exit(1);
    }
}

fn main() {
    if let Err(err) = result_lens::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

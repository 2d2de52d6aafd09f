fn main() {
    let res = proctree::app::run();
    if let Err(err) = res {
        proctree::clean_logger();
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

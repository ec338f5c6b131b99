// src/main.rs
use log::LevelFilter;

fn main() {
    let mut clog = colog::default_builder();
    let level = match std::env::var("LYRIC_SCRAPE_LOG").ok().as_deref() {
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        Some("warn") => LevelFilter::Warn,
        _ => LevelFilter::Info,
    };
    clog.filter(None, level);
    clog.init();

    if let Err(e) = lyric_scrape::cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

use tracing_subscriber::EnvFilter;

mod cache;
mod config;
mod error;
mod mpris;
mod player;
mod resource;
mod runtime;
mod source;
mod track;

fn main() {
    // Logs go to stderr so they never interleave with the console prompt.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = runtime::run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

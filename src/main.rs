use anyhow::Context;
use tracing_subscriber::EnvFilter;

use mazegraph::{CancelToken, MazeConfig, Registry, codec, solvers};

const LOG_FILE: &str = "mazegraph.log";

fn main() -> anyhow::Result<()> {
    // Logs go to a file, stdout is reserved for the maze
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let config = match args.next() {
        Some(path) => {
            let input = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {path}"))?;
            MazeConfig::from_toml_str(&input)
                .with_context(|| format!("invalid config file {path}"))?
        }
        None => {
            eprintln!("Usage: mazegraph <config.toml>. Using the default config.");
            MazeConfig::default()
        }
    };

    let registry = Registry::default();
    let grid = mazegraph::build_maze(&config, &registry, CancelToken::new())
        .with_context(|| format!("failed to build a maze with {:?}", config.algorithm))?;

    print!("{grid}");
    println!();
    println!("{}", codec::encode(&grid));
    println!();
    match solvers::longest_path(&grid) {
        Some(path) => println!("Longest path: {} moves", path.distance()),
        None => println!("No path found."),
    }
    Ok(())
}

use std::{sync::mpsc::sync_channel, thread, time::Instant};

use mazegraph::{
    Grid, Registry,
    generators::{GenContext, Snapshot, generate_maze},
};
use tracing_subscriber::EnvFilter;

const ROWS: usize = 64;
const COLUMNS: usize = 64;
const MAX_SNAPSHOTS_IN_CHANNEL_BUFFER: usize = 64;

fn main() -> anyhow::Result<()> {
    let file_appender = tracing_appender::rolling::never(".", "profile.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1)
        .max(1);

    let registry = Registry::default();
    for name in registry.names() {
        let generator = registry.lookup(name)?;

        // Drain snapshots on another thread, the way an animating consumer would
        let (snapshot_tx, snapshot_rx) = sync_channel::<Snapshot>(MAX_SNAPSHOTS_IN_CHANNEL_BUFFER);
        let consumer = thread::spawn(move || snapshot_rx.into_iter().count());

        let mut grid = Grid::new(ROWS, COLUMNS, &[])?;
        let mut ctx = GenContext::new(Some(0)).with_publisher(snapshot_tx);
        let start = Instant::now();
        for _ in 0..num_iters {
            generate_maze(&mut grid, generator, &mut ctx)?;
        }
        let elapsed = start.elapsed();
        drop(ctx);

        let snapshots = consumer
            .join()
            .map_err(|_| anyhow::anyhow!("snapshot consumer panicked"))?;
        tracing::info!(name, ?elapsed, snapshots, "profiled generator");
        println!(
            "{name:<24} {:.3?} per maze, {snapshots} snapshots",
            elapsed / u32::try_from(num_iters)?
        );
    }
    Ok(())
}

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{SyncSender, TrySendError},
    },
    thread,
    time::Duration,
};

use rand::{SeedableRng, rngs::StdRng};

use crate::error::GenerationError;
use crate::maze::Grid;

/// How long a publisher waits on a full channel before polling cancellation again
const PUBLISH_RETRY_INTERVAL: Duration = Duration::from_millis(1);

/// Get a random number generator, optionally seeded for reproducibility.
pub(crate) fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Shared flag that lets a supervisor stop a running generator.
///
/// The flag reads "keep running"; cancelling clears it. Clones share the same flag.
#[derive(Debug, Clone)]
pub struct CancelToken(Arc<AtomicBool>);

impl Default for CancelToken {
    fn default() -> Self {
        CancelToken(Arc::new(AtomicBool::new(true)))
    }
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        !self.0.load(Ordering::Acquire)
    }
}

/// An immutable copy of the grid published while a generator runs.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Sequence number, increasing within one generation run
    pub version: u64,
    pub grid: Arc<Grid>,
}

/// Tuning knobs for the generators that have any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenOptions {
    /// Chance that a Kruskal weave draw attempts a crossing
    pub weave_probability: f64,
    /// Chance that recursive division leaves a small region open as a room
    pub room_probability: f64,
    /// Regions narrower and shorter than this may become rooms
    pub room_size: usize,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            weave_probability: 0.0,
            room_probability: 0.0,
            room_size: 5,
        }
    }
}

fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

/// State shared by a generator run: randomness, cancellation and snapshot publication.
///
/// A bounded publisher channel doubles as the pacing mechanism: the generator waits on a
/// full channel until the consumer catches up, still honoring cancellation while it waits.
pub struct GenContext {
    rng: StdRng,
    cancel: CancelToken,
    publisher: Option<SyncSender<Snapshot>>,
    options: GenOptions,
    published: u64,
}

impl GenContext {
    pub fn new(seed: Option<u64>) -> Self {
        GenContext {
            rng: get_rng(seed),
            cancel: CancelToken::default(),
            publisher: None,
            options: GenOptions::default(),
            published: 0,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_publisher(mut self, publisher: SyncSender<Snapshot>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn with_options(mut self, options: GenOptions) -> Self {
        self.options = GenOptions {
            weave_probability: clamp_probability(options.weave_probability),
            room_probability: clamp_probability(options.room_probability),
            room_size: options.room_size,
        };
        self
    }

    pub fn options(&self) -> &GenOptions {
        &self.options
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Fails with [`GenerationError::StopRequested`] once the token is cancelled.
    pub fn checkpoint(&self) -> Result<(), GenerationError> {
        if self.cancel.is_cancelled() {
            return Err(GenerationError::StopRequested);
        }
        Ok(())
    }

    /// Checkpoint after a link change, publishing a snapshot when someone is listening.
    pub fn step(&mut self, grid: &Grid) -> Result<(), GenerationError> {
        self.checkpoint()?;
        self.publish(grid)
    }

    pub(crate) fn publish(&mut self, grid: &Grid) -> Result<(), GenerationError> {
        let Some(publisher) = &self.publisher else {
            return Ok(());
        };
        self.published += 1;
        let mut snapshot = Snapshot {
            version: self.published,
            grid: Arc::new(grid.clone()),
        };
        loop {
            match publisher.try_send(snapshot) {
                Ok(()) => return Ok(()),
                Err(TrySendError::Full(pending)) => {
                    self.checkpoint()?;
                    snapshot = pending;
                    thread::sleep(PUBLISH_RETRY_INTERVAL);
                }
                Err(TrySendError::Disconnected(_)) => break,
            }
        }
        tracing::debug!("snapshot receiver dropped, no longer publishing");
        self.publisher = None;
        Ok(())
    }
}

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Sender};
use std::sync::Arc;
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use datamap::Storage;
use game::persistence::{ensure_schema, MapSerializer, PersistenceError};
use game::timing::DecayTimeline;
use game::{Configuration, DataError, World};
use log::{debug, error, info};

pub use metrics::*;

mod metrics;

#[derive(Debug)]
pub enum ServerError {
    Storage(rusqlite::Error),
    Data(DataError),
    Persistence(PersistenceError),
    Stopped,
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::Storage(error) => write!(f, "storage error, {}", error),
            ServerError::Data(error) => write!(f, "data error, {}", error),
            ServerError::Persistence(error) => write!(f, "persistence error, {}", error),
            ServerError::Stopped => write!(f, "server thread stopped unexpectedly"),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<rusqlite::Error> for ServerError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Storage(error)
    }
}

impl From<DataError> for ServerError {
    fn from(error: DataError) -> Self {
        Self::Data(error)
    }
}

impl From<PersistenceError> for ServerError {
    fn from(error: PersistenceError) -> Self {
        Self::Persistence(error)
    }
}

/// Background thread owning the world. Houses are restored before `spawn`
/// returns and saved once more when the thread is terminated.
pub struct LocalServerThread {
    pub running: Arc<AtomicBool>,
    handle: Option<JoinHandle<Result<(), ServerError>>>,
}

impl LocalServerThread {
    pub fn spawn<S>(
        config: Configuration,
        metrics: PersistenceMetrics,
        setup: S,
    ) -> Result<Self, ServerError>
    where
        S: FnOnce(&mut World) + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let (notify_started, started) = channel();
        let running_thread = running.clone();
        let handle = thread::spawn(move || {
            run(config, metrics, setup, running_thread, notify_started)
        });
        match started.recv() {
            Ok(Ok(())) => Ok(Self {
                running,
                handle: Some(handle),
            }),
            Ok(Err(error)) => {
                let _ = handle.join();
                Err(error)
            }
            Err(_) => {
                let _ = handle.join();
                Err(ServerError::Stopped)
            }
        }
    }

    /// Stops the thread and waits for the final save.
    pub fn terminate(&mut self) -> Result<(), ServerError> {
        self.running.store(false, Ordering::Relaxed);
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| ServerError::Stopped)?,
            None => Ok(()),
        }
    }
}

fn run<S>(
    config: Configuration,
    metrics: PersistenceMetrics,
    setup: S,
    running: Arc<AtomicBool>,
    notify_started: Sender<Result<(), ServerError>>,
) -> Result<(), ServerError>
where
    S: FnOnce(&mut World),
{
    info!("Start house persistence thread");
    let (mut storage, mut world, mut timeline) = match startup(&config, &metrics, setup) {
        Ok(state) => state,
        Err(error) => {
            error!("Unable to start house persistence, {}", error);
            let _ = notify_started.send(Err(error));
            return Ok(());
        }
    };
    let _ = notify_started.send(Ok(()));

    let autosave = Duration::from_secs(config.autosave_interval);
    let mut tick = Instant::now();
    let mut last_save = Instant::now();
    while running.load(Ordering::Relaxed) {
        let elapsed = tick.elapsed().as_millis() as u32;
        tick = Instant::now();
        let expired = timeline.advance(elapsed);
        if !expired.is_empty() {
            debug!("Decay finished for {} items", expired.len());
        }
        if config.autosave_interval > 0 && last_save.elapsed() >= autosave {
            let _ = save_world(&mut storage, &world, &config, &metrics);
            last_save = Instant::now();
        }
        thread::sleep(Duration::from_millis(20));
    }

    let result = save_world(&mut storage, &world, &config, &metrics);
    info!("Stop house persistence thread");
    result.map_err(ServerError::from)
}

fn startup<S>(
    config: &Configuration,
    metrics: &PersistenceMetrics,
    setup: S,
) -> Result<(Storage, World, DecayTimeline), ServerError>
where
    S: FnOnce(&mut World),
{
    let mut storage = Storage::open(&config.database)?;
    ensure_schema(&storage)?;
    let mut world = World::new();
    if storage.has_table("item_types")? {
        world.load_game_knowledge(&storage)?;
    }
    setup(&mut world);

    let mut timeline = DecayTimeline::default();
    let mut serializer = MapSerializer::new(&mut storage, config);
    let report = serializer.load_house_items(&mut world, &mut timeline)?;
    metrics.loaded_rows.inc_by(report.loaded as u64);
    metrics.abandoned_rows.inc_by(report.abandoned as u64);
    serializer.load_house_info(&mut world)?;
    Ok((storage, world, timeline))
}

/// Saves house metadata and house items. Each part is its own transaction.
pub fn save_world(
    storage: &mut Storage,
    world: &World,
    config: &Configuration,
    metrics: &PersistenceMetrics,
) -> Result<(), PersistenceError> {
    let mut serializer = MapSerializer::new(storage, config);
    let result = serializer
        .save_house_info(world)
        .and_then(|_| serializer.save_house_items(world));
    match result {
        Ok(_) => {
            metrics.saves.inc();
            Ok(())
        }
        Err(error) => {
            error!("Unable to save houses, {}", error);
            metrics.failed_saves.inc();
            Err(error)
        }
    }
}

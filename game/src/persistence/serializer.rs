use std::time::Instant;

use datamap::{BatchInsert, Storage};
use log::{info, warn};
use rusqlite::types::Value;

use crate::persistence::{save_tile, ItemLoader, PersistenceError, PropStream, PropWriteStream};
use crate::timing::Decay;
use crate::{Configuration, World};

/// Outcome of a house items load pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub abandoned: usize,
}

/// Persists house tiles and house metadata of a world into the store.
pub struct MapSerializer<'a> {
    pub(super) storage: &'a mut Storage,
    pub(super) config: &'a Configuration,
}

impl<'a> MapSerializer<'a> {
    pub fn new(storage: &'a mut Storage, config: &'a Configuration) -> Self {
        Self { storage, config }
    }

    /// Replaces the stored snapshot of every house tile. Nothing is written
    /// unless the whole snapshot is. Returns the number of stored rows.
    pub fn save_house_items(&mut self, world: &World) -> Result<usize, PersistenceError> {
        let started = Instant::now();
        let rows = self
            .storage
            .within_transaction(|transaction| -> Result<usize, PersistenceError> {
                transaction.execute("delete from tile_store", [])?;
                let mut batch = BatchInsert::new("tile_store", &["house_id", "data"]);
                let mut stream = PropWriteStream::new();
                for house in world.housing.houses.values() {
                    for position in &house.tiles {
                        let tile = match world.tile_at(*position) {
                            Some(tile) => tile,
                            None => continue,
                        };
                        save_tile(&mut stream, &world.inventory, tile)?;
                        if stream.is_empty() {
                            continue;
                        }
                        let row = [
                            Value::Integer(house.id.0.into()),
                            Value::Blob(stream.as_bytes().to_vec()),
                        ];
                        batch.add_row(transaction, row)?;
                        stream.clear();
                    }
                }
                Ok(batch.execute(transaction)?)
            })?;
        info!(
            "Saved house items in {} seconds, {} tiles",
            started.elapsed().as_secs_f32(),
            rows
        );
        Ok(rows)
    }

    /// Restores every stored tile row. A broken row is logged and skipped,
    /// the rows after it are still restored.
    pub fn load_house_items(
        &mut self,
        world: &mut World,
        decay: &mut dyn Decay,
    ) -> Result<LoadReport, PersistenceError> {
        let started = Instant::now();
        let rows: Vec<Vec<u8>> = self
            .storage
            .find_all("select data from tile_store", |row| row.get(0))?;
        let mut report = LoadReport::default();
        let mut loader = ItemLoader::new(world, decay);
        for (index, data) in rows.iter().enumerate() {
            let mut stream = PropStream::new(data);
            match loader.load_tile(&mut stream) {
                Ok(_) => report.loaded += 1,
                Err(error) => {
                    warn!("Abandon house tile row {}, {}", index, error);
                    report.abandoned += 1;
                }
            }
        }
        info!(
            "Loaded house items in {} seconds, {} tiles, {} abandoned",
            started.elapsed().as_secs_f32(),
            report.loaded,
            report.abandoned
        );
        Ok(report)
    }
}

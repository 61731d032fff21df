use std::time::Instant;

use datamap::BatchInsert;
use log::{info, warn};
use rusqlite::types::Value;
use rusqlite::{params, OptionalExtension};

use crate::housing::HouseId;
use crate::persistence::{MapSerializer, PersistenceError};
use crate::World;

struct HouseRow {
    id: HouseId,
    owner: u32,
    new_owner: i64,
    paid: i64,
    warnings: u32,
}

struct AccessListRow {
    house: HouseId,
    list: u32,
    text: String,
}

impl<'a> MapSerializer<'a> {
    /// Writes owner, rent state and access lists of every house in one
    /// transaction.
    pub fn save_house_info(&mut self, world: &World) -> Result<(), PersistenceError> {
        let started = Instant::now();
        self.storage
            .within_transaction(|transaction| -> Result<(), PersistenceError> {
                for house in world.housing.houses.values() {
                    let beds = world.house_beds(house.id)? as i64;
                    let exists = transaction
                        .query_row("select id from houses where id = ?", [house.id.0], |row| {
                            row.get::<_, u32>(0)
                        })
                        .optional()?
                        .is_some();
                    if exists {
                        transaction.execute(
                            "update houses set owner = ?, paid = ?, warnings = ?, name = ?, \
                             town_id = ?, rent = ?, size = ?, beds = ? where id = ?",
                            params![
                                house.owner,
                                house.paid_until,
                                house.rent_warnings,
                                house.name,
                                house.town_id,
                                house.rent,
                                house.size() as i64,
                                beds,
                                house.id.0
                            ],
                        )?;
                    } else {
                        transaction.execute(
                            "insert into houses (id, owner, paid, warnings, name, town_id, \
                             rent, size, beds) values (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                            params![
                                house.id.0,
                                house.owner,
                                house.paid_until,
                                house.rent_warnings,
                                house.name,
                                house.town_id,
                                house.rent,
                                house.size() as i64,
                                beds
                            ],
                        )?;
                    }
                }

                transaction.execute("delete from house_lists", [])?;
                let mut batch = BatchInsert::new("house_lists", &["house_id", "listid", "list"]);
                for house in world.housing.houses.keys() {
                    for (list, access) in world.access_lists(*house)? {
                        if access.is_empty() {
                            continue;
                        }
                        let row = [
                            Value::Integer(house.0.into()),
                            Value::Integer(list.into()),
                            Value::Text(access.text().to_string()),
                        ];
                        batch.add_row(transaction, row)?;
                    }
                }
                batch.execute(transaction)?;
                Ok(())
            })?;
        info!(
            "Saved house info in {} seconds, {} houses",
            started.elapsed().as_secs_f32(),
            world.housing.houses.len()
        );
        Ok(())
    }

    /// Applies stored house rows to the houses the world still has.
    ///
    /// With `transfer_owner_on_restart` a pending owner change is carried
    /// out once: items follow the house, access lists are dropped and the
    /// stored row is rewritten so the change is not repeated.
    pub fn load_house_info(&mut self, world: &mut World) -> Result<(), PersistenceError> {
        let started = Instant::now();
        let houses = self.storage.find_all(
            "select id, owner, new_owner, paid, warnings from houses",
            |row| {
                Ok::<_, rusqlite::Error>(HouseRow {
                    id: HouseId(row.get(0)?),
                    owner: row.get(1)?,
                    new_owner: row.get(2)?,
                    paid: row.get(3)?,
                    warnings: row.get(4)?,
                })
            },
        )?;
        let lists = self
            .storage
            .find_all("select house_id, listid, list from house_lists", |row| {
                Ok::<_, rusqlite::Error>(AccessListRow {
                    house: HouseId(row.get(0)?),
                    list: row.get(1)?,
                    text: row.get(2)?,
                })
            })?;

        let mut transferred = vec![];
        for row in houses {
            if world.housing.get_house(row.id).is_err() {
                warn!("House {} is stored but no longer exists", row.id);
                continue;
            }
            world.housing.get_house_mut(row.id)?.owner = row.owner;
            if self.config.transfer_owner_on_restart && row.new_owner >= 0 {
                let new_owner = row.new_owner as u32;
                info!(
                    "Transfer house {} from {} to {}",
                    row.id, row.owner, new_owner
                );
                world.transfer_house(row.id, row.owner, new_owner)?;
                transferred.push((row.id, new_owner));
            }
            let house = world.housing.get_house_mut(row.id)?;
            house.paid_until = row.paid;
            house.rent_warnings = row.warnings;
        }

        for row in lists {
            if transferred.iter().any(|(house, _)| *house == row.house) {
                continue;
            }
            if let Err(error) = world.set_access_list(row.house, row.list, &row.text) {
                warn!("Skip access list {} of house {}, {}", row.list, row.house, error);
            }
        }

        if !transferred.is_empty() {
            self.storage
                .within_transaction(|transaction| -> Result<(), PersistenceError> {
                    for (house, owner) in &transferred {
                        transaction.execute(
                            "update houses set owner = ?, new_owner = -1 where id = ?",
                            params![owner, house.0],
                        )?;
                        transaction
                            .execute("delete from house_lists where house_id = ?", [house.0])?;
                    }
                    Ok(())
                })?;
        }
        info!(
            "Loaded house info in {} seconds, {} owners transferred",
            started.elapsed().as_secs_f32(),
            transferred.len()
        );
        Ok(())
    }
}

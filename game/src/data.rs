use std::fmt::{Display, Formatter};

use datamap::Storage;
use log::info;
use serde::de;
use serde_json::Value;

use crate::collections::DictionaryError;
use crate::inventory::{ItemKey, ItemKind};
use crate::World;

impl World {
    pub fn load_game_knowledge(&mut self, storage: &Storage) -> Result<(), DataError> {
        info!("Begin game knowledge loading from ...");
        let kinds = storage.find_all("select * from item_types", |row| load_item_kind(row))?;
        let mut references = vec![];
        for kind in kinds {
            references.extend(kind.transform_on_use);
            references.extend(kind.decay_to);
            self.known.items.insert(kind.id, kind.name.clone(), kind);
        }
        for key in references {
            self.known.items.get(key)?;
        }
        info!(
            "End game knowledge loading, {} item types",
            self.known.items.len()
        );
        Ok(())
    }
}

pub(crate) fn load_item_kind(row: &rusqlite::Row) -> Result<ItemKind, DataError> {
    let data = ItemKind {
        id: ItemKey(row.get("id")?),
        name: row.get("name")?,
        group: row.get_json("category")?,
        movable: row.get("movable")?,
        force_serialize: row.get("force_serialize")?,
        transform_on_use: row.get::<_, Option<u16>>("transform_on_use")?.map(ItemKey),
        decay_to: row.get::<_, Option<u16>>("decay_to")?.map(ItemKey),
        decay_duration: row.get("decay_duration")?,
    };
    Ok(data)
}

#[derive(Debug)]
pub enum DataError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Sql(rusqlite::Error),
    Inconsistency(DictionaryError),
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::Io(error) => write!(f, "io error, {}", error),
            DataError::Json(error) => write!(f, "json error, {}", error),
            DataError::Sql(error) => write!(f, "sql error, {}", error),
            DataError::Inconsistency(error) => write!(f, "inconsistency, {}", error),
        }
    }
}

impl std::error::Error for DataError {}

impl From<std::io::Error> for DataError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<DictionaryError> for DataError {
    fn from(error: DictionaryError) -> Self {
        Self::Inconsistency(error)
    }
}

impl From<serde_json::Error> for DataError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}

impl From<rusqlite::Error> for DataError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Sql(error)
    }
}

pub trait JsonDeserializer {
    fn get_json<T>(&self, index: &str) -> Result<T, DataError>
    where
        T: de::DeserializeOwned;
}

impl<'stmt> JsonDeserializer for rusqlite::Row<'stmt> {
    /// Bare words are read as JSON strings, so `Door` and `"Door"` both
    /// decode into the same enum variant.
    fn get_json<T>(&self, index: &str) -> Result<T, DataError>
    where
        T: de::DeserializeOwned,
    {
        let value: String = self.get(index)?;
        let value = value.trim();
        let value = match value.chars().next() {
            Some('[') | Some('{') | Some('"') => serde_json::from_str(value)?,
            _ => Value::String(value.to_string()),
        };
        let value = serde_json::from_value(value)?;
        Ok(value)
    }
}

use std::fmt::{Display, Formatter};

use crate::housing::{HouseId, HousingError};
use crate::inventory::{InventoryError, ItemKey};
use crate::model::Position;
use crate::WorldError;

/// Malformed or truncated binary record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    UnexpectedEnd { field: &'static str },
    MissingTerminator { found: Option<u8> },
    UnknownAttribute { tag: u8 },
    UnexpectedAttribute { tag: u8, key: ItemKey },
    InvalidString { tag: u8 },
}

/// Record that is well formed but points at something that is not there
/// or must not be restored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    UnknownItemType { key: ItemKey },
    LegacyBed { key: ItemKey },
    TileNotFound { position: Position },
    HouseNotFound { id: HouseId },
    AccessListNotFound { house: HouseId, list: u32 },
    Inventory(InventoryError),
}

#[derive(Debug)]
pub enum PersistenceError {
    Format(FormatError),
    Reference(ReferenceError),
    Store(rusqlite::Error),
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatError::UnexpectedEnd { field } => {
                write!(f, "record ends before {}", field)
            }
            FormatError::MissingTerminator { found: Some(tag) } => {
                write!(f, "expected terminator, found tag {}", tag)
            }
            FormatError::MissingTerminator { found: None } => {
                write!(f, "expected terminator, found end of record")
            }
            FormatError::UnknownAttribute { tag } => write!(f, "unknown attribute tag {}", tag),
            FormatError::UnexpectedAttribute { tag, key } => {
                write!(f, "attribute tag {} is not valid for item {}", tag, key.0)
            }
            FormatError::InvalidString { tag } => {
                write!(f, "attribute tag {} holds a truncated or invalid string", tag)
            }
        }
    }
}

impl Display for ReferenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceError::UnknownItemType { key } => write!(f, "unknown item type {}", key.0),
            ReferenceError::LegacyBed { key } => write!(f, "legacy bed {} is rejected", key.0),
            ReferenceError::TileNotFound { position } => write!(f, "no tile at {}", position),
            ReferenceError::HouseNotFound { id } => write!(f, "house {} not found", id),
            ReferenceError::AccessListNotFound { house, list } => {
                write!(f, "house {} has no access list {}", house, list)
            }
            ReferenceError::Inventory(error) => Display::fmt(error, f),
        }
    }
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceError::Format(error) => write!(f, "format error, {}", error),
            PersistenceError::Reference(error) => write!(f, "reference error, {}", error),
            PersistenceError::Store(error) => write!(f, "store error, {}", error),
        }
    }
}

impl std::error::Error for FormatError {}

impl std::error::Error for ReferenceError {}

impl std::error::Error for PersistenceError {}

impl From<FormatError> for PersistenceError {
    fn from(error: FormatError) -> Self {
        Self::Format(error)
    }
}

impl From<ReferenceError> for PersistenceError {
    fn from(error: ReferenceError) -> Self {
        Self::Reference(error)
    }
}

impl From<InventoryError> for PersistenceError {
    fn from(error: InventoryError) -> Self {
        Self::Reference(ReferenceError::Inventory(error))
    }
}

impl From<HousingError> for PersistenceError {
    fn from(error: HousingError) -> Self {
        match error {
            HousingError::HouseNotFound { id } => {
                Self::Reference(ReferenceError::HouseNotFound { id })
            }
            HousingError::AccessListNotFound { house, list } => {
                Self::Reference(ReferenceError::AccessListNotFound { house, list })
            }
        }
    }
}

impl From<WorldError> for PersistenceError {
    fn from(error: WorldError) -> Self {
        match error {
            WorldError::TileNotFound { position } => {
                Self::Reference(ReferenceError::TileNotFound { position })
            }
            WorldError::UnknownItemType { key } => {
                Self::Reference(ReferenceError::UnknownItemType { key })
            }
            WorldError::Inventory(error) => error.into(),
            WorldError::Housing(error) => error.into(),
        }
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Store(error)
    }
}

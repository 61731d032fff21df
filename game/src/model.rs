use std::fmt::{Display, Formatter};

use crate::collections::Dictionary;
use crate::inventory::{ItemId, ItemKey, ItemKind};

#[derive(Default)]
pub struct Knowledge {
    pub items: Dictionary<ItemKey, ItemKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: u16,
    pub y: u16,
    pub z: u8,
}

impl Position {
    pub const fn new(x: u16, y: u16, z: u8) -> Self {
        Self { x, y, z }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Floor cell of the static world. Items are kept in insertion order.
pub struct Tile {
    pub position: Position,
    pub items: Vec<ItemId>,
}

impl Tile {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            items: vec![],
        }
    }
}

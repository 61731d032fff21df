use std::collections::HashMap;
use std::fmt::{Display, Formatter};

pub use config::*;
pub use data::*;
pub use domains::*;

use crate::collections::Shared;
use crate::housing::{
    AccessList, House, HouseId, HousingDomain, HousingError, ItemReturn, GUEST_LIST,
    SUBOWNER_LIST,
};
use crate::inventory::{
    InventoryDomain, InventoryError, Item, ItemId, ItemKey, ItemKind, ItemVariant, Parent,
};
use crate::model::{Knowledge, Position, Tile};

pub mod collections;
mod config;
mod data;
mod domains;
pub mod model;
pub mod persistence;

/// Live state of the static world: tile index, item arena, houses and the
/// item type catalog.
#[derive(Default)]
pub struct World {
    pub known: Knowledge,
    pub tiles: HashMap<Position, Tile>,
    pub inventory: InventoryDomain,
    pub housing: HousingDomain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    TileNotFound { position: Position },
    UnknownItemType { key: ItemKey },
    Inventory(InventoryError),
    Housing(HousingError),
}

impl Display for WorldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WorldError::TileNotFound { position } => write!(f, "tile {} not found", position),
            WorldError::UnknownItemType { key } => write!(f, "unknown item type {}", key.0),
            WorldError::Inventory(error) => Display::fmt(error, f),
            WorldError::Housing(error) => Display::fmt(error, f),
        }
    }
}

impl std::error::Error for WorldError {}

impl From<InventoryError> for WorldError {
    fn from(error: InventoryError) -> Self {
        Self::Inventory(error)
    }
}

impl From<HousingError> for WorldError {
    fn from(error: HousingError) -> Self {
        Self::Housing(error)
    }
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn tile_at(&self, position: Position) -> Option<&Tile> {
        self.tiles.get(&position)
    }

    pub fn add_tile(&mut self, position: Position) {
        self.tiles
            .entry(position)
            .or_insert_with(|| Tile::new(position));
    }

    /// Registers a house and binds the given tiles to it, creating missing
    /// tiles on the way.
    pub fn add_house(&mut self, mut house: House, tiles: &[Position]) {
        for position in tiles {
            self.add_tile(*position);
            if !house.tiles.contains(position) {
                house.tiles.push(*position);
            }
        }
        self.housing.load_houses(vec![house]);
    }

    /// Creates an item of `kind` on top of a tile.
    pub fn place_item(
        &mut self,
        position: Position,
        kind: &Shared<ItemKind>,
    ) -> Result<ItemId, WorldError> {
        let index = self
            .tile_at(position)
            .ok_or(WorldError::TileNotFound { position })?
            .items
            .len();
        let id = self.inventory.create_item(kind);
        self.attach_item(Parent::Tile(position), index, id)?;
        Ok(id)
    }

    /// Creates an item of `kind` as the newest entry of a container.
    pub fn put_item(
        &mut self,
        container: ItemId,
        kind: &Shared<ItemKind>,
    ) -> Result<ItemId, WorldError> {
        let index = self.inventory.get_item(container)?.children().len();
        let id = self.inventory.create_item(kind);
        self.attach_item(Parent::Container(container), index, id)?;
        Ok(id)
    }

    /// Attaches a detached item to a tile or container at `index`. A bed
    /// with a sleeper claims that sleeper.
    pub fn attach_item(
        &mut self,
        parent: Parent,
        index: usize,
        id: ItemId,
    ) -> Result<(), WorldError> {
        match parent {
            Parent::Tile(position) => {
                let item = self.inventory.get_item(id)?;
                if item.parent != Parent::Detached {
                    return Err(InventoryError::ItemNotDetached { id }.into());
                }
                let tile = self
                    .tiles
                    .get_mut(&position)
                    .ok_or(WorldError::TileNotFound { position })?;
                let index = index.min(tile.items.len());
                tile.items.insert(index, id);
                self.inventory.get_item_mut(id)?.parent = parent;
            }
            Parent::Container(container) => self.inventory.insert_item(container, index, id)?,
            Parent::Detached => return Ok(()),
        }
        if let Some(sleeper) = self.inventory.get_item(id)?.sleeper() {
            self.claim_bed(sleeper, id);
        }
        Ok(())
    }

    /// Changes a live item to the catalog kind `key` in place.
    pub fn transform_item(&mut self, id: ItemId, key: ItemKey) -> Result<(), WorldError> {
        let kind = self
            .known
            .items
            .get(key)
            .map_err(|_| WorldError::UnknownItemType { key })?;
        self.inventory.transform_item(id, &kind)?;
        Ok(())
    }

    /// Removes a detached item with all its contents. Sleeper claims on
    /// removed beds are dropped.
    pub fn destroy_item(&mut self, id: ItemId) -> Result<Vec<Item>, WorldError> {
        let destroyed = self.inventory.destroy_item(id)?;
        self.housing
            .sleepers
            .retain(|_, bed| !destroyed.iter().any(|item| item.id == *bed));
        Ok(destroyed)
    }

    /// First live item on the tile that a saved record of `kind` stands for:
    /// same type, its transform target, or any door for door kinds.
    pub fn find_stationary(&self, position: Position, kind: &ItemKind) -> Option<ItemId> {
        let tile = self.tile_at(position)?;
        tile.items.iter().copied().find(|id| {
            let item = match self.inventory.items.get(id) {
                Some(item) => item,
                None => return false,
            };
            item.kind.id == kind.id
                || kind.transform_on_use == Some(item.kind.id)
                || (kind.is_door() && matches!(item.variant, ItemVariant::Door { .. }))
        })
    }

    /// Records that `sleeper` sleeps in `bed`. A player claims one bed at
    /// most, an older claim is cleared.
    pub fn claim_bed(&mut self, sleeper: u32, bed: ItemId) {
        if let Some(previous) = self.housing.sleepers.insert(sleeper, bed) {
            if previous != bed {
                self.clear_sleeper(previous, sleeper);
            }
        }
    }

    /// Drops the bed claim of `sleeper` and frees the bed it pointed to.
    pub fn release_sleeper(&mut self, sleeper: u32) -> Option<ItemId> {
        let bed = self.housing.sleepers.remove(&sleeper)?;
        self.clear_sleeper(bed, sleeper);
        Some(bed)
    }

    fn clear_sleeper(&mut self, bed: ItemId, sleeper: u32) {
        if let Some(item) = self.inventory.items.get_mut(&bed) {
            if let ItemVariant::Bed {
                sleeper: current,
                sleep_start,
            } = &mut item.variant
            {
                if *current == sleeper {
                    *current = 0;
                    *sleep_start = 0;
                }
            }
        }
    }

    /// Every item on the house tiles, nested items included.
    pub fn house_items(&self, id: HouseId) -> Result<Vec<ItemId>, HousingError> {
        let house = self.housing.get_house(id)?;
        let mut items = vec![];
        for position in &house.tiles {
            if let Some(tile) = self.tile_at(*position) {
                for item in &tile.items {
                    items.extend(self.inventory.descendants(*item));
                }
            }
        }
        Ok(items)
    }

    /// Door fixtures lying directly on the house tiles.
    pub fn house_doors(&self, id: HouseId) -> Result<Vec<ItemId>, HousingError> {
        let items = self.top_level_items(id)?;
        Ok(items
            .into_iter()
            .filter(|item| match self.inventory.items.get(item) {
                Some(item) => matches!(item.variant, ItemVariant::Door { .. }),
                None => false,
            })
            .collect())
    }

    pub fn house_beds(&self, id: HouseId) -> Result<usize, HousingError> {
        let items = self.top_level_items(id)?;
        Ok(items
            .into_iter()
            .filter(|item| match self.inventory.items.get(item) {
                Some(item) => matches!(item.variant, ItemVariant::Bed { .. }),
                None => false,
            })
            .count())
    }

    fn top_level_items(&self, id: HouseId) -> Result<Vec<ItemId>, HousingError> {
        let house = self.housing.get_house(id)?;
        Ok(house
            .tiles
            .iter()
            .filter_map(|position| self.tile_at(*position))
            .flat_map(|tile| tile.items.iter().copied())
            .collect())
    }

    /// Hands the house over from `old_owner` to `new_owner`.
    ///
    /// Items owned by the old owner follow the house to the new owner. When
    /// the house becomes vacant they stay with the old owner and are queued
    /// in `pending_returns`. The new owner starts with empty access lists
    /// and no sleepers.
    pub fn transfer_house(
        &mut self,
        id: HouseId,
        old_owner: u32,
        new_owner: u32,
    ) -> Result<(), HousingError> {
        let owned: Vec<ItemId> = self
            .house_items(id)?
            .into_iter()
            .filter(|item| match self.inventory.items.get(item) {
                Some(item) => old_owner != 0 && item.attributes.owner == Some(old_owner),
                None => false,
            })
            .collect();
        if !owned.is_empty() {
            if new_owner == 0 {
                self.housing.pending_returns.push(ItemReturn {
                    house: id,
                    owner: old_owner,
                    items: owned,
                });
            } else {
                for item in owned {
                    if let Some(item) = self.inventory.items.get_mut(&item) {
                        item.attributes.owner = Some(new_owner);
                    }
                }
            }
        }

        let fixtures = self.top_level_items(id)?;
        for fixture in fixtures {
            let sleeper = match self.inventory.items.get_mut(&fixture) {
                Some(item) => match &mut item.variant {
                    ItemVariant::Door { access_list, .. } => {
                        *access_list = AccessList::default();
                        None
                    }
                    ItemVariant::Bed { sleeper, .. } if *sleeper != 0 => Some(*sleeper),
                    _ => None,
                },
                None => None,
            };
            if let Some(sleeper) = sleeper {
                self.release_sleeper(sleeper);
            }
        }

        let house = self.housing.get_house_mut(id)?;
        house.guest_list = AccessList::default();
        house.subowner_list = AccessList::default();
        house.owner = new_owner;
        Ok(())
    }

    /// Applies a stored access list: guest, sub-owner or the list of the door
    /// whose house door id equals `list`.
    pub fn set_access_list(
        &mut self,
        id: HouseId,
        list: u32,
        text: &str,
    ) -> Result<(), HousingError> {
        match list {
            GUEST_LIST => self.housing.get_house_mut(id)?.guest_list = AccessList::parse(text),
            SUBOWNER_LIST => {
                self.housing.get_house_mut(id)?.subowner_list = AccessList::parse(text)
            }
            _ => {
                let door = self.house_doors(id)?.into_iter().find(|door| {
                    matches!(
                        self.inventory.items.get(door).map(|item| &item.variant),
                        Some(ItemVariant::Door { door_id, .. })
                            if *door_id != 0 && u32::from(*door_id) == list
                    )
                });
                let variant = door
                    .and_then(|door| self.inventory.items.get_mut(&door))
                    .map(|item| &mut item.variant);
                match variant {
                    Some(ItemVariant::Door { access_list, .. }) => {
                        *access_list = AccessList::parse(text)
                    }
                    _ => return Err(HousingError::AccessListNotFound { house: id, list }),
                }
            }
        }
        Ok(())
    }

    /// Access lists of a house keyed by their list id, empty lists included.
    pub fn access_lists(&self, id: HouseId) -> Result<Vec<(u32, &AccessList)>, HousingError> {
        let house = self.housing.get_house(id)?;
        let mut lists = vec![
            (GUEST_LIST, &house.guest_list),
            (SUBOWNER_LIST, &house.subowner_list),
        ];
        for door in self.house_doors(id)? {
            if let Some(ItemVariant::Door {
                door_id,
                access_list,
            }) = self.inventory.items.get(&door).map(|item| &item.variant)
            {
                if *door_id != 0 {
                    lists.push((u32::from(*door_id), access_list));
                }
            }
        }
        Ok(lists)
    }
}

use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};

use crate::housing::AccessList;
use crate::inventory::ItemId;
use crate::model::Position;

/// List id of the house guest list in the access list table.
pub const GUEST_LIST: u32 = 0x100;
/// List id of the house sub-owner list in the access list table.
pub const SUBOWNER_LIST: u32 = 0x101;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HouseId(pub u32);

impl Display for HouseId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
pub struct House {
    pub id: HouseId,
    pub name: String,
    pub town_id: u32,
    pub rent: u32,
    /// Player guid, zero when the house is vacant.
    pub owner: u32,
    pub paid_until: i64,
    pub rent_warnings: u32,
    pub tiles: Vec<Position>,
    pub guest_list: AccessList,
    pub subowner_list: AccessList,
}

impl House {
    pub fn new(id: HouseId, name: &str, town_id: u32, rent: u32) -> Self {
        Self {
            id,
            name: name.to_string(),
            town_id,
            rent,
            owner: 0,
            paid_until: 0,
            rent_warnings: 0,
            tiles: vec![],
            guest_list: AccessList::default(),
            subowner_list: AccessList::default(),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.tiles.len()
    }
}

/// Items left in a house whose owner lost it; they still belong to the
/// prior owner and wait to be handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReturn {
    pub house: HouseId,
    pub owner: u32,
    pub items: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HousingError {
    HouseNotFound { id: HouseId },
    AccessListNotFound { house: HouseId, list: u32 },
}

impl Display for HousingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HousingError::HouseNotFound { id } => write!(f, "house {} not found", id),
            HousingError::AccessListNotFound { house, list } => {
                write!(f, "house {} has no access list {}", house, list)
            }
        }
    }
}

impl std::error::Error for HousingError {}

#[derive(Default)]
pub struct HousingDomain {
    pub houses: BTreeMap<HouseId, House>,
    /// Bed claimed by each sleeping player.
    pub sleepers: HashMap<u32, ItemId>,
    pub pending_returns: Vec<ItemReturn>,
}

impl HousingDomain {
    pub fn load_houses(&mut self, houses: Vec<House>) {
        for house in houses {
            self.houses.insert(house.id, house);
        }
    }

    pub fn get_house(&self, id: HouseId) -> Result<&House, HousingError> {
        self.houses
            .get(&id)
            .ok_or(HousingError::HouseNotFound { id })
    }

    pub fn get_house_mut(&mut self, id: HouseId) -> Result<&mut House, HousingError> {
        self.houses
            .get_mut(&id)
            .ok_or(HousingError::HouseNotFound { id })
    }
}

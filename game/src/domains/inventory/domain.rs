use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use crate::collections::{Sequence, Shared};
use crate::housing::AccessList;
use crate::inventory::InventoryError::ItemNotFound;
use crate::model::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
pub enum ItemGroup {
    Common,
    Container,
    Door,
    Bed,
    Carpet,
    Teleport,
}

#[derive(Debug)]
pub struct ItemKind {
    pub id: ItemKey,
    pub name: String,
    pub group: ItemGroup,
    pub movable: bool,
    pub force_serialize: bool,
    pub transform_on_use: Option<ItemKey>,
    pub decay_to: Option<ItemKey>,
    /// Seconds, zero when the kind never decays.
    pub decay_duration: u32,
}

impl ItemKind {
    pub fn is_saved_to_houses(&self) -> bool {
        self.movable
            || self.force_serialize
            || matches!(
                self.group,
                ItemGroup::Door | ItemGroup::Bed | ItemGroup::Carpet
            )
    }

    #[inline]
    pub fn is_bed(&self) -> bool {
        self.group == ItemGroup::Bed
    }

    #[inline]
    pub fn is_door(&self) -> bool {
        self.group == ItemGroup::Door
    }

    #[inline]
    pub fn is_carpet(&self) -> bool {
        self.group == ItemGroup::Carpet
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub usize);

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Back-reference to whatever holds an item. Never ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    Detached,
    Tile(Position),
    Container(ItemId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemAttributes {
    pub action_id: Option<u16>,
    pub unique_id: Option<u16>,
    pub text: Option<String>,
    pub description: Option<String>,
    pub count: Option<u8>,
    /// Remaining decay time in milliseconds.
    pub duration: Option<u32>,
    pub decaying_state: Option<u8>,
    pub written_date: Option<u32>,
    pub written_by: Option<String>,
    pub charges: Option<u16>,
    pub name: Option<String>,
    pub owner: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemVariant {
    Common,
    Container {
        items: Vec<ItemId>,
    },
    Door {
        door_id: u8,
        access_list: AccessList,
    },
    Bed {
        sleeper: u32,
        sleep_start: u32,
    },
    Teleport {
        destination: Option<Position>,
    },
}

impl ItemVariant {
    pub fn of(group: ItemGroup) -> Self {
        match group {
            ItemGroup::Common | ItemGroup::Carpet => ItemVariant::Common,
            ItemGroup::Container => ItemVariant::Container { items: vec![] },
            ItemGroup::Door => ItemVariant::Door {
                door_id: 0,
                access_list: AccessList::default(),
            },
            ItemGroup::Bed => ItemVariant::Bed {
                sleeper: 0,
                sleep_start: 0,
            },
            ItemGroup::Teleport => ItemVariant::Teleport { destination: None },
        }
    }

    pub fn is_same_variant(&self, other: &ItemVariant) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

#[derive(Debug)]
pub struct Item {
    pub id: ItemId,
    pub kind: Shared<ItemKind>,
    pub parent: Parent,
    pub attributes: ItemAttributes,
    pub variant: ItemVariant,
}

impl Item {
    pub fn children(&self) -> &[ItemId] {
        match &self.variant {
            ItemVariant::Container { items } => items,
            _ => &[],
        }
    }

    pub fn sleeper(&self) -> Option<u32> {
        match self.variant {
            ItemVariant::Bed { sleeper, .. } if sleeper != 0 => Some(sleeper),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    ItemNotFound { id: ItemId },
    ItemNotDetached { id: ItemId },
    NotContainer { id: ItemId },
    ContainerHasItems { id: ItemId },
}

impl Display for InventoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InventoryError::ItemNotFound { id } => write!(f, "item {} not found", id),
            InventoryError::ItemNotDetached { id } => {
                write!(f, "item {} is already placed", id)
            }
            InventoryError::NotContainer { id } => write!(f, "item {} is not a container", id),
            InventoryError::ContainerHasItems { id } => {
                write!(f, "container {} still holds items", id)
            }
        }
    }
}

impl std::error::Error for InventoryError {}

/// Arena of every live item, addressed by stable ids.
#[derive(Default)]
pub struct InventoryDomain {
    pub items_id: Sequence,
    pub items: HashMap<ItemId, Item>,
}

impl InventoryDomain {
    pub fn get_item(&self, id: ItemId) -> Result<&Item, InventoryError> {
        self.items.get(&id).ok_or(ItemNotFound { id })
    }

    pub fn get_item_mut(&mut self, id: ItemId) -> Result<&mut Item, InventoryError> {
        self.items.get_mut(&id).ok_or(ItemNotFound { id })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

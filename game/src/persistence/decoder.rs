use log::{debug, warn};

use crate::collections::Shared;
use crate::inventory::{ItemId, ItemKey, ItemKind, ItemVariant, Parent};
use crate::model::Position;
use crate::persistence::{
    unserialize_attributes, AttributesEnd, FormatError, PersistenceError, PropStream,
    ReferenceError, ATTR_END,
};
use crate::timing::Decay;
use crate::World;

/// Bed type ids below this value were reassigned and are never restored
/// from house snapshots.
pub const NEW_BEDS_START_ID: u16 = 30000;

/// Restores saved tile snapshots into a live world.
///
/// Movable items are recreated, stationary fixtures that already exist on
/// the tile are updated in place. Records of fixtures that are gone are
/// still read to the end and then dropped.
pub struct ItemLoader<'a> {
    world: &'a mut World,
    decay: &'a mut dyn Decay,
}

impl<'a> ItemLoader<'a> {
    pub fn new(world: &'a mut World, decay: &'a mut dyn Decay) -> Self {
        Self { world, decay }
    }

    /// Decodes one tile row. Any error means the rest of the row is
    /// abandoned; items restored before the error stay in the world.
    pub fn load_tile(&mut self, stream: &mut PropStream) -> Result<Position, PersistenceError> {
        let x = read(stream, "tile position")?;
        let y = read(stream, "tile position")?;
        let z = read(stream, "tile position")?;
        let count: u32 = read(stream, "tile item count")?;
        let position = Position::new(x, y, z);
        let anchor = self
            .world
            .tile_at(position)
            .ok_or(ReferenceError::TileNotFound { position })?
            .items
            .len();
        for _ in 0..count {
            self.load_item(stream, Parent::Tile(position), anchor, true)?;
        }
        Ok(position)
    }

    /// Decodes one item record for `parent`. New items are inserted at
    /// `anchor`, so records written newest first come back in their
    /// original order.
    pub fn load_item(
        &mut self,
        stream: &mut PropStream,
        parent: Parent,
        anchor: usize,
        is_house_item: bool,
    ) -> Result<(), PersistenceError> {
        let key = ItemKey(read(stream, "item type")?);
        let kind = self
            .world
            .known
            .items
            .get(key)
            .map_err(|_| ReferenceError::UnknownItemType { key })?;
        if is_house_item && kind.is_bed() && key.0 < NEW_BEDS_START_ID {
            return Err(ReferenceError::LegacyBed { key }.into());
        }
        match parent {
            Parent::Tile(position) if !(kind.movable || kind.is_carpet() || kind.is_bed()) => {
                match self.world.find_stationary(position, &kind) {
                    Some(fixture) => self.reconcile_fixture(stream, fixture, position, &kind),
                    None => {
                        debug!(
                            "Item {} at {} no longer exists, its record is skipped",
                            key.0, position
                        );
                        self.skip_item(stream, &kind)
                    }
                }
            }
            _ => self.restore_item(stream, parent, anchor, &kind),
        }
    }

    /// Reads the declared children of `container` and the closing
    /// terminator.
    pub fn load_container(
        &mut self,
        stream: &mut PropStream,
        container: ItemId,
        count: u32,
    ) -> Result<(), PersistenceError> {
        let anchor = self.world.inventory.get_item(container)?.children().len();
        for _ in 0..count {
            self.load_item(stream, Parent::Container(container), anchor, false)?;
        }
        match stream.read::<u8>() {
            Some(ATTR_END) => Ok(()),
            found => Err(FormatError::MissingTerminator { found }.into()),
        }
    }

    fn restore_item(
        &mut self,
        stream: &mut PropStream,
        parent: Parent,
        anchor: usize,
        kind: &Shared<ItemKind>,
    ) -> Result<(), PersistenceError> {
        let id = self.world.inventory.create_item(kind);
        let mut result = self.read_item(stream, id, kind.id);
        if result.is_ok() {
            result = self
                .world
                .attach_item(parent, anchor, id)
                .map_err(PersistenceError::from);
        }
        if let Err(error) = result {
            self.discard(id);
            return Err(error);
        }
        self.begin_decay(id);
        Ok(())
    }

    fn reconcile_fixture(
        &mut self,
        stream: &mut PropStream,
        fixture: ItemId,
        position: Position,
        kind: &Shared<ItemKind>,
    ) -> Result<(), PersistenceError> {
        let item = self.world.inventory.get_item(fixture)?;
        let mut attributes = item.attributes.clone();
        let saved_variant = ItemVariant::of(kind.group);
        let mut variant = if item.variant.is_same_variant(&saved_variant) {
            item.variant.clone()
        } else {
            saved_variant
        };
        let end = match unserialize_attributes(stream, &mut attributes, &mut variant, kind.id) {
            Ok(end) => end,
            Err(error) => {
                warn!(
                    "Unable to restore item {} at {}, fixture {} is kept as is, {}",
                    kind.id.0, position, fixture, error
                );
                return Ok(());
            }
        };

        self.world.transform_item(fixture, kind.id)?;
        self.cancel_decay(fixture);
        let item = self.world.inventory.get_item_mut(fixture)?;
        item.attributes = attributes;
        if !matches!(variant, ItemVariant::Container { .. }) {
            item.variant = variant;
        }
        if let AttributesEnd::ContainerItems(count) = end {
            self.load_container(stream, fixture, count)?;
        }
        self.begin_decay(fixture);
        Ok(())
    }

    /// Consumes a record whose fixture is gone. Beds never get here, their
    /// records always recreate the bed.
    fn skip_item(
        &mut self,
        stream: &mut PropStream,
        kind: &Shared<ItemKind>,
    ) -> Result<(), PersistenceError> {
        let id = self.world.inventory.create_item(kind);
        let result = self.read_item(stream, id, kind.id);
        self.discard(id);
        result
    }

    fn read_item(
        &mut self,
        stream: &mut PropStream,
        id: ItemId,
        key: ItemKey,
    ) -> Result<(), PersistenceError> {
        let item = self.world.inventory.get_item_mut(id)?;
        let end = unserialize_attributes(stream, &mut item.attributes, &mut item.variant, key)?;
        if let AttributesEnd::ContainerItems(count) = end {
            self.load_container(stream, id, count)?;
        }
        Ok(())
    }

    fn discard(&mut self, id: ItemId) {
        if let Ok(items) = self.world.destroy_item(id) {
            for item in &items {
                self.decay.cancel_decay(item);
            }
        }
    }

    fn begin_decay(&mut self, id: ItemId) {
        if let Ok(item) = self.world.inventory.get_item(id) {
            self.decay.begin_decay(item);
        }
    }

    fn cancel_decay(&mut self, id: ItemId) {
        if let Ok(item) = self.world.inventory.get_item(id) {
            self.decay.cancel_decay(item);
        }
    }
}

#[inline]
fn read<T: crate::persistence::Primitive>(
    stream: &mut PropStream,
    field: &'static str,
) -> Result<T, FormatError> {
    stream.read().ok_or(FormatError::UnexpectedEnd { field })
}

use crate::inventory::{InventoryDomain, InventoryError, ItemId, ItemVariant};
use crate::model::Tile;
use crate::persistence::{
    serialize_attributes, PropWriteStream, ATTR_CONTAINER_ITEMS, ATTR_END,
};

/// Writes one item with its whole subtree. Container children are written
/// newest first.
pub fn save_item(
    stream: &mut PropWriteStream,
    inventory: &InventoryDomain,
    id: ItemId,
) -> Result<(), InventoryError> {
    let item = inventory.get_item(id)?;
    stream.write(item.kind.id.0);
    serialize_attributes(stream, &item.attributes, &item.variant);
    if let ItemVariant::Container { items } = &item.variant {
        stream.write(ATTR_CONTAINER_ITEMS);
        stream.write(items.len() as u32);
        for child in items.iter().rev() {
            save_item(stream, inventory, *child)?;
        }
    }
    stream.write(ATTR_END);
    Ok(())
}

/// Writes the tile snapshot, or nothing at all when the tile holds no item
/// that is persisted with houses.
pub fn save_tile(
    stream: &mut PropWriteStream,
    inventory: &InventoryDomain,
    tile: &Tile,
) -> Result<(), InventoryError> {
    let mut items = Vec::with_capacity(tile.items.len());
    for id in tile.items.iter().rev() {
        if inventory.get_item(*id)?.kind.is_saved_to_houses() {
            items.push(*id);
        }
    }
    if items.is_empty() {
        return Ok(());
    }
    let position = tile.position;
    stream.write(position.x);
    stream.write(position.y);
    stream.write(position.z);
    stream.write(items.len() as u32);
    for id in items {
        save_item(stream, inventory, id)?;
    }
    Ok(())
}

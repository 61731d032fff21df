use crate::inventory::{InventoryDomain, InventoryError, Item, ItemId, Parent};

impl InventoryDomain {
    /// Removes a detached item and everything nested in it from the arena.
    /// Removed items are returned children first.
    pub fn destroy_item(&mut self, id: ItemId) -> Result<Vec<Item>, InventoryError> {
        let item = self.get_item(id)?;
        if item.parent != Parent::Detached {
            return Err(InventoryError::ItemNotDetached { id });
        }
        let mut destroyed = vec![];
        for descendant in self.descendants(id).into_iter().rev() {
            if let Some(item) = self.items.remove(&descendant) {
                destroyed.push(item);
            }
        }
        Ok(destroyed)
    }
}

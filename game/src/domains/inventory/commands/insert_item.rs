use crate::inventory::InventoryError::{ItemNotDetached, NotContainer};
use crate::inventory::{InventoryDomain, InventoryError, ItemId, ItemVariant, Parent};

impl InventoryDomain {
    /// Puts a detached item into a container at `index`, clamped to the
    /// container size.
    pub fn insert_item(
        &mut self,
        container: ItemId,
        index: usize,
        id: ItemId,
    ) -> Result<(), InventoryError> {
        if self.get_item(id)?.parent != Parent::Detached {
            return Err(ItemNotDetached { id });
        }
        match &mut self.get_item_mut(container)?.variant {
            ItemVariant::Container { items } => {
                let index = index.min(items.len());
                items.insert(index, id);
            }
            _ => return Err(NotContainer { id: container }),
        }
        self.get_item_mut(id)?.parent = Parent::Container(container);
        Ok(())
    }
}

use crate::collections::Shared;
use crate::inventory::InventoryError::ContainerHasItems;
use crate::inventory::{InventoryDomain, InventoryError, ItemId, ItemKind, ItemVariant};

impl InventoryDomain {
    /// Changes the kind of a live item in place. Identity, parent and
    /// contents survive; the variant is re-derived only when the new kind
    /// belongs to a different group.
    pub fn transform_item(
        &mut self,
        id: ItemId,
        kind: &Shared<ItemKind>,
    ) -> Result<(), InventoryError> {
        let item = self.get_item_mut(id)?;
        if item.kind.id == kind.id {
            return Ok(());
        }
        let variant = ItemVariant::of(kind.group);
        if !item.variant.is_same_variant(&variant) {
            if !item.children().is_empty() {
                return Err(ContainerHasItems { id });
            }
            item.variant = variant;
        }
        item.kind = kind.clone();
        Ok(())
    }
}

use crate::collections::Shared;
use crate::inventory::{
    InventoryDomain, Item, ItemAttributes, ItemId, ItemKind, ItemVariant, Parent,
};

impl InventoryDomain {
    /// Instantiates a detached item of the given kind.
    pub fn create_item(&mut self, kind: &Shared<ItemKind>) -> ItemId {
        let id = self.items_id.one(ItemId);
        let item = Item {
            id,
            kind: kind.clone(),
            parent: Parent::Detached,
            attributes: ItemAttributes::default(),
            variant: ItemVariant::of(kind.group),
        };
        self.items.insert(id, item);
        id
    }
}

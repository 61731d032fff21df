use crate::inventory::{InventoryDomain, ItemId};

impl InventoryDomain {
    /// Collects the item and everything nested in it, parents before
    /// children. Ids missing from the arena are skipped.
    pub fn descendants(&self, id: ItemId) -> Vec<ItemId> {
        let mut result = vec![];
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(item) = self.items.get(&next) {
                result.push(next);
                stack.extend(item.children().iter().rev());
            }
        }
        result
    }
}

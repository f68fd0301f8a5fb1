//! # Inventory
//!
//! Per-type block stock and the currently selected type.

use std::{collections::HashMap, fmt};

use crate::{
    application_state::settings::{InventoryMode, InventorySettings},
    engine_state::voxels::block::block_type::BlockId,
};

/// Raised when stock is taken that is not there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsufficientInventory(pub BlockId);

impl fmt::Display for InsufficientInventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no {} left in the inventory", self.0)
    }
}

impl std::error::Error for InsufficientInventory {}

/// Block counts by type plus the selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    counts: HashMap<BlockId, u32>,
    selected: BlockId,
    mode: InventoryMode,
}

impl Inventory {
    /// Builds the starting inventory.
    pub fn new(settings: &InventorySettings) -> Self {
        let mut counts = HashMap::new();
        for stack in &settings.starting {
            *counts.entry(stack.block).or_insert(0) += stack.count;
        }
        Inventory {
            counts,
            selected: settings.selected,
            mode: settings.mode,
        }
    }

    /// Counted or unlimited.
    pub fn mode(&self) -> InventoryMode {
        self.mode
    }

    /// Units of `id` held. Unlimited inventories report `u32::MAX`.
    pub fn count(&self, id: BlockId) -> u32 {
        match self.mode {
            InventoryMode::Unlimited => u32::MAX,
            InventoryMode::Counted => self.counts.get(&id).copied().unwrap_or(0),
        }
    }

    /// Whether at least one unit of `id` can be taken.
    pub fn has(&self, id: BlockId) -> bool {
        self.count(id) > 0
    }

    /// Adds one unit of `id`.
    pub fn add(&mut self, id: BlockId) {
        if self.mode == InventoryMode::Counted {
            let count = self.counts.entry(id).or_insert(0);
            *count = count.saturating_add(1);
        }
    }

    /// Takes one unit of `id`, failing without change if there is none.
    pub fn take(&mut self, id: BlockId) -> Result<(), InsufficientInventory> {
        if self.mode == InventoryMode::Unlimited {
            return Ok(());
        }
        match self.counts.get_mut(&id) {
            Some(count) if *count > 0 => {
                *count -= 1;
                Ok(())
            }
            _ => Err(InsufficientInventory(id)),
        }
    }

    /// The selected block type.
    pub fn selected(&self) -> BlockId {
        self.selected
    }

    /// Changes the selection. Returns whether it changed.
    pub fn select(&mut self, id: BlockId) -> bool {
        let changed = self.selected != id;
        self.selected = id;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_state::settings::StackSettings;

    fn counted(stacks: &[(BlockId, u32)]) -> Inventory {
        Inventory::new(&InventorySettings {
            mode: InventoryMode::Counted,
            starting: stacks
                .iter()
                .map(|&(block, count)| StackSettings { block, count })
                .collect(),
            selected: BlockId::STONE,
        })
    }

    #[test]
    fn take_until_empty() {
        let mut inventory = counted(&[(BlockId::STONE, 2)]);
        assert!(inventory.take(BlockId::STONE).is_ok());
        assert!(inventory.take(BlockId::STONE).is_ok());
        assert_eq!(
            inventory.take(BlockId::STONE),
            Err(InsufficientInventory(BlockId::STONE))
        );
        assert_eq!(inventory.count(BlockId::STONE), 0);
    }

    #[test]
    fn add_restocks_unknown_types() {
        let mut inventory = counted(&[]);
        inventory.add(BlockId::COAL_ORE);
        assert_eq!(inventory.count(BlockId::COAL_ORE), 1);
    }

    #[test]
    fn duplicate_stacks_are_summed() {
        let inventory = counted(&[(BlockId::SAND, 3), (BlockId::SAND, 4)]);
        assert_eq!(inventory.count(BlockId::SAND), 7);
    }

    #[test]
    fn unlimited_never_runs_out() {
        let mut inventory = Inventory::new(&InventorySettings {
            mode: InventoryMode::Unlimited,
            starting: Vec::new(),
            selected: BlockId::GRASS,
        });
        for _ in 0..100 {
            assert!(inventory.take(BlockId::GRASS).is_ok());
        }
        assert!(inventory.has(BlockId::GOLD_ORE));
    }

    #[test]
    fn select_reports_changes() {
        let mut inventory = counted(&[]);
        assert!(!inventory.select(BlockId::STONE));
        assert!(inventory.select(BlockId::WOOD));
        assert_eq!(inventory.selected(), BlockId::WOOD);
    }
}

pub mod chain_index;
pub mod recency_list;
pub mod slot_arena;

pub use chain_index::{ChainIndex, IndexStats};
pub use recency_list::RecencyList;
pub use slot_arena::{SlotArena, SlotId};

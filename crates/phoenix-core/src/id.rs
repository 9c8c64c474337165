use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a timer inside a [`Scheduler`](crate::clock::Scheduler).
    pub struct TimerId;
}

/// Identifies a product in a point-of-sale catalog. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

/// Distinguishes the timer consumers that share one scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerTag(pub u32);

/// Version counter carried by every scheduled timer. A fire whose generation
/// no longer matches its owner's is stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    /// The generation that follows this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_id_equality() {
        assert_eq!(ProductId(1), ProductId(1));
        assert_ne!(ProductId(1), ProductId(2));
    }

    #[test]
    fn generation_advances() {
        let g = Generation::default();
        assert_eq!(g.next(), Generation(1));
        assert_eq!(Generation(u64::MAX).next(), Generation(0));
    }

    #[test]
    fn ids_are_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ProductId(1), "coffee");
        map.insert(ProductId(2), "croissant");
        assert_eq!(map[&ProductId(2)], "croissant");
    }
}

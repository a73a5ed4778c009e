//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Records in the ledger that are addressed by id (saved quotations) implement
/// this so lookups by id can be written once.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Position of the first entity in `items` whose id equals `id`.
pub fn position_of<E: Entity>(items: &[E], id: &E::Id) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Row(u32);

    impl Entity for Row {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.0
        }
    }

    #[test]
    fn position_finds_first_match() {
        let rows = vec![Row(3), Row(7), Row(7)];
        assert_eq!(position_of(&rows, &7), Some(1));
        assert_eq!(position_of(&rows, &9), None);
    }
}

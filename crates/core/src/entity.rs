//! Entity trait: identity that survives attribute changes.

use std::collections::HashSet;

/// Entity marker + minimal interface.
///
/// Catalog materials are entities: two rows with the same id are the same
/// material even if a refresh changed their attributes.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// First id that occurs more than once, in input order.
pub fn first_duplicate_id<E: Entity>(items: &[E]) -> Option<&E::Id> {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().map(Entity::id).find(|id| !seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(u32, &'static str);

    impl Entity for Row {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.0
        }
    }

    #[test]
    fn finds_first_repeated_id() {
        let rows = [Row(1, "a"), Row(2, "b"), Row(3, "c"), Row(2, "d"), Row(1, "e")];
        assert_eq!(first_duplicate_id(&rows), Some(&2));
        assert_eq!(rows[3].1, "d");
    }

    #[test]
    fn unique_ids_have_no_duplicate() {
        let rows = [Row(1, "a"), Row(2, "b")];
        assert_eq!(first_duplicate_id(&rows), None);
        assert_eq!(first_duplicate_id::<Row>(&[]), None);
    }
}

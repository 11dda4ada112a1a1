use std::{collections::BTreeSet, hash::Hash};

/// Type alias for sets that remember the order in which elements were inserted.
pub type Set<S> = indexmap::IndexSet<S>;
/// Type alias for maps that remember the order in which keys were inserted.
pub type Map<K, V> = indexmap::IndexMap<K, V>;
/// Type alias for sets whose iteration order is the order of the elements, we use
/// these wherever two collections have to be compared by content alone.
pub type OrderedSet<S> = BTreeSet<S>;
/// Type alias for hash maps that are only used for lookups, iteration order is irrelevant.
pub type LookupMap<K, V> = fxhash::FxHashMap<K, V>;

/// A partition groups elements of type `I` into disjoint, non-empty classes. The
/// classes are kept in a fixed order, which makes the index of a class meaningful.
#[derive(Debug, Clone)]
pub struct Partition<I: Hash + Eq> {
    classes: Vec<Vec<I>>,
    index: LookupMap<I, usize>,
}

impl<I: Hash + Eq> std::ops::Deref for Partition<I> {
    type Target = Vec<Vec<I>>;
    fn deref(&self) -> &Self::Target {
        &self.classes
    }
}

impl<'a, I: Hash + Eq> IntoIterator for &'a Partition<I> {
    type Item = &'a Vec<I>;
    type IntoIter = std::slice::Iter<'a, Vec<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.classes.iter()
    }
}

impl<I: Hash + Eq + Ord + Clone> PartialEq for Partition<I> {
    fn eq(&self, other: &Self) -> bool {
        let normalize = |p: &Self| {
            p.classes
                .iter()
                .map(|class| class.iter().cloned().collect::<OrderedSet<_>>())
                .collect::<OrderedSet<_>>()
        };
        self.size() == other.size() && normalize(self) == normalize(other)
    }
}
impl<I: Hash + Eq + Ord + Clone> Eq for Partition<I> {}

impl<I: Hash + Eq + Clone> Partition<I> {
    /// Builds a new partition from an iterator that yields iterators which yield
    /// elements of type `I`. Empty classes are skipped.
    pub fn new<X: IntoIterator<Item = I>, Y: IntoIterator<Item = X>>(iter: Y) -> Self {
        let classes: Vec<Vec<I>> = iter
            .into_iter()
            .map(|it| it.into_iter().collect::<Vec<_>>())
            .filter(|class| !class.is_empty())
            .collect();
        let index = classes
            .iter()
            .enumerate()
            .flat_map(|(i, class)| class.iter().map(move |x| (x.clone(), i)))
            .collect();
        Self { classes, index }
    }

    /// Returns the size of the partition, i.e. the number of classes.
    pub fn size(&self) -> usize {
        self.classes.len()
    }

    /// Returns the index of the class that contains `x`, or `None` if `x` is not
    /// covered by the partition.
    pub fn class_of<Q>(&self, x: &Q) -> Option<usize>
    where
        I: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(x).copied()
    }

    /// Consumes the partition and returns its classes.
    pub fn into_classes(self) -> Vec<Vec<I>> {
        self.classes
    }
}

#[cfg(test)]
mod tests {
    use super::Partition;

    #[test]
    fn partition_lookup_skips_empty_classes() {
        let partition = Partition::new([vec!["a", "b"], vec![], vec!["c"]]);
        assert_eq!(partition.size(), 2);
        assert_eq!(partition.class_of("b"), Some(0));
        assert_eq!(partition.class_of("c"), Some(1));
        assert_eq!(partition.class_of("d"), None);
    }

    #[test]
    fn partition_equality_ignores_order() {
        let left = Partition::new([vec![1, 2], vec![3]]);
        let right = Partition::new([vec![3], vec![2, 1]]);
        assert_eq!(left, right);
        assert_ne!(left, Partition::new([vec![1], vec![2, 3]]));
    }
}

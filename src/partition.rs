use std::collections::{BTreeMap, BTreeSet};

use crate::error::{CrntError, Result};

/// A collection of pairwise disjoint equivalence classes.
///
/// The union of the classes is the basic set of the partition. Every insertion
/// is checked against it, so a partition is never left with overlapping classes.
#[derive(Clone, Debug)]
pub struct Partition<T: Ord> {
    classes: Vec<BTreeSet<T>>,
    /// Maps every element of the basic set to the index of its class.
    owner: BTreeMap<T, usize>,
}

impl<T: Ord> Default for Partition<T> {
    fn default() -> Self {
        Partition {
            classes: Vec::new(),
            owner: BTreeMap::new(),
        }
    }
}

impl<T: Ord + Clone> Partition<T> {
    pub fn new() -> Partition<T> {
        Partition::default()
    }

    /// Builds a partition from the given classes, failing if any two of them overlap.
    pub fn try_from_classes(classes: impl IntoIterator<Item = BTreeSet<T>>) -> Result<Partition<T>> {
        let mut partition = Partition::new();
        for class in classes {
            partition.add_equivalence_class(class)?;
        }
        Ok(partition)
    }

    /// Inserts a class into the partition.
    /// Fails with [`CrntError::NotDisjoint`] if it intersects the basic set,
    /// leaving the partition unchanged.
    pub fn add_equivalence_class(&mut self, class: BTreeSet<T>) -> Result<()> {
        if class.iter().any(|element| self.owner.contains_key(element)) {
            return Err(CrntError::NotDisjoint);
        }
        let idx = self.classes.len();
        self.owner
            .extend(class.iter().map(|element| (element.clone(), idx)));
        self.classes.push(class);
        Ok(())
    }
}

impl<T: Ord> Partition<T> {
    /// The class containing the element, if any.
    pub fn equivalence_class_of(&self, element: &T) -> Option<&BTreeSet<T>> {
        self.owner.get(element).map(|&idx| &self.classes[idx])
    }

    /// Whether both elements belong to the same class.
    pub fn are_equivalent(&self, a: &T, b: &T) -> bool {
        match (self.owner.get(a), self.owner.get(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Whether the exact class is one of the classes of the partition.
    pub fn contains_class(&self, class: &BTreeSet<T>) -> bool {
        class
            .first()
            .and_then(|element| self.equivalence_class_of(element))
            .is_some_and(|candidate| candidate == class)
    }

    /// Whether every class of `self` is contained in some class of `other`.
    /// Both partitions must cover the same basic set.
    pub fn is_finer_than(&self, other: &Partition<T>) -> Result<bool> {
        if !self.owner.keys().eq(other.owner.keys()) {
            return Err(CrntError::IncomparableBasicSets);
        }
        Ok(self.classes.iter().all(|class| {
            class
                .first()
                .and_then(|element| other.equivalence_class_of(element))
                .is_some_and(|candidate| class.is_subset(candidate))
        }))
    }

    /// The union of all the classes.
    pub fn basic_set(&self) -> impl Iterator<Item = &T> {
        self.owner.keys()
    }

    pub fn contains(&self, element: &T) -> bool {
        self.owner.contains_key(element)
    }

    /// The number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BTreeSet<T>> {
        self.classes.iter()
    }
}

/// Two partitions are equal when they have the same classes, in any order.
impl<T: Ord> PartialEq for Partition<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|class| other.contains_class(class))
    }
}

impl<T: Ord> Eq for Partition<T> {}

impl<'t, T: Ord> IntoIterator for &'t Partition<T> {
    type Item = &'t BTreeSet<T>;

    type IntoIter = std::slice::Iter<'t, BTreeSet<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

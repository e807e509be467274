use std::{
    collections::BTreeMap,
    fmt::{self, Display},
};

use itertools::{EitherOrBoth, Itertools};
use num_traits::Zero;
use ordered_float::OrderedFloat;
use smallvec::SmallVec;

use crate::{
    error::{CrntError, Result},
    species::Species,
};

/// Most complexes in practice hold at most this many distinct species.
pub const INLINE_SPECIES: usize = 4;

/// A multiset of species, and a node of the complex graph.
///
/// The entries are kept sorted by species id with strictly positive counts,
/// so the derived equality, ordering and hashing are structural.
/// The complex with no species is the zero complex.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Complex {
    entries: SmallVec<[(Species, OrderedFloat<f64>); INLINE_SPECIES]>,
}

fn check_count(species: &Species, count: f64) -> Result<()> {
    if count.is_finite() && count >= 0. {
        Ok(())
    } else {
        Err(CrntError::InvalidCount {
            species: species.id().to_owned(),
            count,
        })
    }
}

impl Complex {
    /// The zero complex, containing no species.
    pub fn zero() -> Complex {
        Complex::default()
    }

    /// Builds a complex from species and their occurrence counts.
    /// Repeated species are merged and species with a zero count are dropped.
    pub fn new(items: impl IntoIterator<Item = (Species, f64)>) -> Result<Complex> {
        let mut merged: BTreeMap<Species, f64> = BTreeMap::new();
        for (species, count) in items {
            check_count(&species, count)?;
            *merged.entry(species).or_default() += count;
        }
        let entries = merged
            .into_iter()
            .filter(|(_, count)| !count.is_zero())
            .map(|(species, count)| (species, OrderedFloat(count)))
            .collect();
        Ok(Complex { entries })
    }

    /// Builds a complex from species ids, creating default species for each id.
    pub fn from_ids<'t>(items: impl IntoIterator<Item = (&'t str, f64)>) -> Result<Complex> {
        let items: Vec<(Species, f64)> = items
            .into_iter()
            .map(|(id, count)| Ok((Species::new(id)?, count)))
            .collect::<Result<_>>()?;
        Complex::new(items)
    }

    /// A complex made of a single copy of the given species.
    pub fn single(species: Species) -> Complex {
        Complex {
            entries: SmallVec::from_iter([(species, OrderedFloat(1.))]),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// The number of distinct species in the complex.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The occurrence count of the species, or zero if it is absent.
    pub fn count(&self, species: &Species) -> f64 {
        self.entries
            .binary_search_by(|(entry, _)| entry.cmp(species))
            .map(|idx| self.entries[idx].1.into_inner())
            .unwrap_or(0.)
    }

    pub fn species(&self) -> impl Iterator<Item = &Species> {
        self.entries.iter().map(|(species, _)| species)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Species, f64)> {
        self.entries.iter().map(|(species, count)| (species, count.into_inner()))
    }

    /// Increases the count of a species.
    pub fn add_species(&mut self, species: Species, count: f64) -> Result<()> {
        check_count(&species, count)?;
        if count.is_zero() {
            return Ok(());
        }
        match self
            .entries
            .binary_search_by(|(entry, _)| entry.cmp(&species))
        {
            Ok(idx) => {
                let entry = &mut self.entries[idx].1;
                *entry = OrderedFloat(entry.into_inner() + count);
            }
            Err(idx) => self.entries.insert(idx, (species, OrderedFloat(count))),
        }
        Ok(())
    }

    /// Decreases the count of a species, removing it once its count reaches zero.
    pub fn remove_species(&mut self, species: &Species, count: f64) -> Result<()> {
        check_count(species, count)?;
        if let Ok(idx) = self
            .entries
            .binary_search_by(|(entry, _)| entry.cmp(species))
        {
            let remaining = self.entries[idx].1.into_inner() - count;
            if remaining <= 0. {
                self.entries.remove(idx);
            } else {
                self.entries[idx].1 = OrderedFloat(remaining);
            }
        }
        Ok(())
    }

    /// The species whose occurrence counts differ between the two complexes.
    pub fn differing_species<'t>(&'t self, other: &'t Complex) -> Vec<&'t Species> {
        self.entries
            .iter()
            .merge_join_by(other.entries.iter(), |(a, _), (b, _)| a.cmp(b))
            .filter_map(|pair| match pair {
                EitherOrBoth::Both((species, a), (_, b)) => (a != b).then_some(species),
                EitherOrBoth::Left((species, _)) | EitherOrBoth::Right((species, _)) => {
                    Some(species)
                }
            })
            .collect()
    }
}

impl Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        let terms = self.iter().map(|(species, count)| {
            if count == 1. {
                species.to_string()
            } else {
                format!("{count} {species}")
            }
        });
        write!(f, "{}", terms.format(" + "))
    }
}

use std::{
    cmp::Ordering,
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

use bon::bon;
use itertools::{chain, EitherOrBoth, Itertools};

use crate::{
    complex::Complex,
    error::{CrntError, Result},
    species::Species,
};

/// A struct describing a single chemical reaction, a directed edge of the complex graph.
///
/// Two reactions are equal iff they have the same id, substrate and product.
#[derive(Clone, Debug)]
pub struct Reaction {
    id: String,
    name: Option<String>,
    /// The complex consumed by the reaction.
    substrate: Complex,
    /// The complex produced by the reaction.
    product: Complex,
    /// The paired reverse reaction. Its own inverse is never stored.
    inverse: Option<Box<Reaction>>,
    reversible: bool,
    notes: Option<String>,
}

#[bon]
impl Reaction {
    /// Builds a reaction, validating the id and the inverse if one is given.
    #[builder]
    pub fn new(
        #[builder(into)] id: String,
        substrate: Complex,
        product: Complex,
        #[builder(into)] name: Option<String>,
        inverse: Option<Reaction>,
        #[builder(default)] reversible: bool,
        #[builder(into)] notes: Option<String>,
    ) -> Result<Reaction> {
        if id.is_empty() {
            return Err(CrntError::InvalidIdentifier { kind: "reaction id" });
        }
        let inverse = match inverse {
            Some(inverse) => {
                if inverse.substrate != product || inverse.product != substrate {
                    return Err(CrntError::InconsistentInverse {
                        reaction: id,
                        inverse: inverse.id,
                    });
                }
                Some(Box::new(Reaction {
                    inverse: None,
                    reversible: true,
                    ..inverse
                }))
            }
            None => None,
        };
        Ok(Reaction {
            reversible: reversible || inverse.is_some(),
            id,
            name,
            substrate,
            product,
            inverse,
            notes,
        })
    }
}

impl Reaction {
    /// Builds an irreversible reaction with no name or notes.
    pub fn simple(id: impl Into<String>, substrate: Complex, product: Complex) -> Result<Reaction> {
        Reaction::builder()
            .id(id)
            .substrate(substrate)
            .product(product)
            .build()
    }

    /// Builds a reaction together with its paired inverse.
    pub fn with_inverse(
        id: impl Into<String>,
        inverse_id: impl Into<String>,
        substrate: Complex,
        product: Complex,
    ) -> Result<Reaction> {
        let inverse = Reaction::simple(inverse_id, product.clone(), substrate.clone())?;
        Reaction::builder()
            .id(id)
            .substrate(substrate)
            .product(product)
            .inverse(inverse)
            .build()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The display name of the reaction, defaulting to its id.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn substrate(&self) -> &Complex {
        &self.substrate
    }

    pub fn product(&self) -> &Complex {
        &self.product
    }

    pub fn inverse(&self) -> Option<&Reaction> {
        self.inverse.as_deref()
    }

    pub fn is_reversible(&self) -> bool {
        self.reversible
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn is_self_loop(&self) -> bool {
        self.substrate == self.product
    }

    /// Splits the reaction into the directed edges it contributes to the complex graph:
    /// itself, and its inverse if it has one.
    pub fn into_edges(mut self) -> impl Iterator<Item = Reaction> {
        let inverse = self.inverse.take().map(|inverse| *inverse);
        std::iter::once(self).chain(inverse)
    }

    /// All the species taking part in the reaction, possibly repeated.
    pub fn all_species(&self) -> impl Iterator<Item = &Species> {
        chain!(self.substrate.species(), self.product.species())
    }

    /// The net change of each species for every firing of the reaction.
    /// Species whose count does not change are omitted.
    pub fn stoichiometry(&self) -> Vec<(&Species, f64)> {
        self.substrate
            .iter()
            .merge_join_by(self.product.iter(), |(a, _), (b, _)| a.cmp(b))
            .map(|pair| match pair {
                EitherOrBoth::Both((species, consumed), (_, produced)) => {
                    (species, produced - consumed)
                }
                EitherOrBoth::Left((species, consumed)) => (species, -consumed),
                EitherOrBoth::Right((species, produced)) => (species, produced),
            })
            .filter(|(_, diff)| *diff != 0.)
            .collect()
    }

    fn key(&self) -> (&str, &Complex, &Complex) {
        (&self.id, &self.substrate, &self.product)
    }
}

impl PartialEq for Reaction {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Reaction {}

impl PartialOrd for Reaction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Reaction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl Hash for Reaction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.id, self.substrate, self.product)
    }
}

use derive_new::new;
use nalgebra::DMatrix;

use crate::{
    error::{CrntError, Result},
    reaction::Reaction,
    species::Species,
};

/// The default tolerance under which singular values count as zero.
pub const DEFAULT_RANK_TOLERANCE: f64 = 1e-9;

/// The species × reactions matrix of net stoichiometric changes.
///
/// Entry `(i, j)` is the count of species `i` in the product of reaction `j`
/// minus its count in the substrate.
#[derive(Clone, Debug)]
pub struct StoichiometricMatrix {
    species: Vec<Species>,
    reactions: Vec<Reaction>,
    matrix: DMatrix<f64>,
}

impl StoichiometricMatrix {
    /// Builds the matrix with one row per species, sorted by id,
    /// and one column per reaction, in the order they are given.
    pub fn new(mut species: Vec<Species>, reactions: Vec<Reaction>) -> Result<StoichiometricMatrix> {
        if reactions.is_empty() {
            return Err(CrntError::EmptyMatrix);
        }
        species.sort();
        species.dedup();
        let mut matrix = DMatrix::zeros(species.len(), reactions.len());
        for (col, reaction) in reactions.iter().enumerate() {
            for (reacting, diff) in reaction.stoichiometry() {
                if let Ok(row) = species.binary_search(reacting) {
                    matrix[(row, col)] = diff;
                }
            }
        }
        Ok(StoichiometricMatrix {
            species,
            reactions,
            matrix,
        })
    }

    /// The species labelling the rows.
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    /// The reactions labelling the columns.
    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// The entry for the species and reaction with the given ids, if both exist.
    pub fn get(&self, species_id: &str, reaction_id: &str) -> Option<f64> {
        let row = self.species.iter().position(|s| s.id() == species_id)?;
        let col = self.reactions.iter().position(|r| r.id() == reaction_id)?;
        Some(self.matrix[(row, col)])
    }
}

/// A collaborator computing the rank of a stoichiometric matrix.
pub trait RankOracle {
    /// Computes the rank, or fails with [`CrntError::RankUnavailable`].
    fn rank(&self, matrix: &StoichiometricMatrix) -> Result<usize>;
}

/// A rank oracle counting the singular values above a tolerance.
#[derive(Clone, Copy, Debug, new)]
pub struct SvdRank {
    tolerance: f64,
}

impl Default for SvdRank {
    fn default() -> Self {
        SvdRank::new(DEFAULT_RANK_TOLERANCE)
    }
}

impl RankOracle for SvdRank {
    fn rank(&self, matrix: &StoichiometricMatrix) -> Result<usize> {
        if !(self.tolerance.is_finite() && self.tolerance >= 0.) {
            return Err(CrntError::RankUnavailable(format!(
                "invalid tolerance {}",
                self.tolerance
            )));
        }
        Ok(matrix.matrix().rank(self.tolerance))
    }
}

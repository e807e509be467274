//! Structural analysis of chemical reaction networks.
//!
//! A [`ReactionNetwork`] is built reaction by reaction, either directly or through
//! the [`ParseState`] text parser, and decomposed into linkage classes and strong
//! linkage classes. On top of the decomposition it answers the structural questions
//! of chemical reaction network theory: terminality, weak reversibility, deficiency,
//! cut pairs and the absolute concentration robustness heuristic.

mod complex;
pub use complex::Complex;
pub mod connectivity;
mod error;
pub use error::{CrntError, Result};
mod network;
pub use network::ReactionNetwork;
mod parsers;
pub use parsers::{ParseState, INVERSE_SUFFIX};
mod partition;
pub use partition::Partition;
mod reaction;
pub use reaction::Reaction;
mod reaction_graph;
pub use reaction_graph::ReactionGraph;
mod species;
pub use species::{Species, DEFAULT_COMPARTMENT};
mod stoichiometry;
pub use stoichiometry::{RankOracle, StoichiometricMatrix, SvdRank, DEFAULT_RANK_TOLERANCE};
#[cfg(test)]
mod tests;

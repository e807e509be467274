use std::{
    cell::OnceCell,
    collections::{hash_map::Entry, BTreeSet},
};

use itertools::Itertools;
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    complex::Complex,
    connectivity::{strong_components, weak_components},
    error::{CrntError, Result},
    partition::Partition,
    reaction::Reaction,
    reaction_graph::ReactionGraph,
    species::Species,
    stoichiometry::{RankOracle, StoichiometricMatrix},
};

/// Ids of the species making up the pseudo complexes used by path searches.
/// They contain characters the reaction file format never produces.
const PSEUDO_SOURCE: &str = "<source>";
const PSEUDO_SINK: &str = "<sink>";

/// A chemical reaction network: the complex graph together with its species.
///
/// The linkage classes and strong linkage classes are computed on demand
/// and cached until the next mutation of the network.
/// The caches are not synchronized; share a network between threads behind a lock.
#[derive(Clone, Debug, Default)]
pub struct ReactionNetwork {
    graph: ReactionGraph,
    species: BTreeSet<Species>,
    compartments: BTreeSet<String>,
    /// For every species, how many reaction endpoints reference each complex containing it.
    species_to_complexes: FxHashMap<Species, FxHashMap<Complex, usize>>,
    linkage_classes: OnceCell<Partition<Complex>>,
    strong_linkage_classes: OnceCell<Partition<Complex>>,
}

impl ReactionNetwork {
    pub fn new() -> ReactionNetwork {
        ReactionNetwork::default()
    }

    pub fn from_reactions(reactions: impl IntoIterator<Item = Reaction>) -> ReactionNetwork {
        let mut network = ReactionNetwork::new();
        for reaction in reactions {
            network.add_reaction(reaction);
        }
        network
    }

    /// Adds the reaction, and its inverse if it has one, to the network.
    /// Returns false if nothing was added: the reaction is a self-loop or is already present.
    pub fn add_reaction(&mut self, reaction: Reaction) -> bool {
        let mut added = false;
        for edge in reaction.into_edges() {
            let (substrate, product) = (edge.substrate().clone(), edge.product().clone());
            if self.graph.add_edge(edge) {
                self.reference_complex(&substrate);
                self.reference_complex(&product);
                added = true;
            }
        }
        if added {
            self.invalidate();
        }
        added
    }

    /// Removes the reaction, and its inverse if it has one, from the network.
    /// Complexes and species no longer used by any reaction are removed too.
    pub fn remove_reaction(&mut self, reaction: &Reaction) -> bool {
        let mut removed = false;
        for edge in reaction.clone().into_edges() {
            if self.graph.remove_edge(&edge) {
                self.release_complex(edge.substrate());
                self.release_complex(edge.product());
                removed = true;
            }
        }
        if removed {
            self.invalidate();
        }
        removed
    }

    fn reference_complex(&mut self, complex: &Complex) {
        for species in complex.species() {
            *self
                .species_to_complexes
                .entry(species.clone())
                .or_default()
                .entry(complex.clone())
                .or_default() += 1;
            if self.species.insert(species.clone()) {
                self.compartments.insert(species.compartment().to_owned());
            }
        }
    }

    fn release_complex(&mut self, complex: &Complex) {
        let mut species_dropped = false;
        for species in complex.species() {
            let Some(complexes) = self.species_to_complexes.get_mut(species) else {
                continue;
            };
            if let Entry::Occupied(mut entry) = complexes.entry(complex.clone()) {
                *entry.get_mut() -= 1;
                if *entry.get() == 0 {
                    entry.remove();
                }
            }
            if complexes.is_empty() {
                self.species_to_complexes.remove(species);
                self.species.remove(species);
                species_dropped = true;
            }
        }
        if species_dropped {
            self.compartments = self
                .species
                .iter()
                .map(|species| species.compartment().to_owned())
                .collect();
        }
    }

    fn invalidate(&mut self) {
        self.linkage_classes.take();
        self.strong_linkage_classes.take();
    }

    /// The underlying complex graph, for adjacency queries.
    pub fn graph(&self) -> &ReactionGraph {
        &self.graph
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Complex> {
        self.graph.nodes()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Reaction> {
        self.graph.edges()
    }

    /// The complexes of the network, sorted.
    pub fn complexes(&self) -> Vec<&Complex> {
        self.graph.nodes().sorted().collect()
    }

    /// The reactions of the network, sorted by id.
    pub fn reactions(&self) -> Vec<&Reaction> {
        self.graph.edges().sorted().collect()
    }

    /// Finds a reaction by id.
    pub fn reaction(&self, id: &str) -> Option<&Reaction> {
        self.graph.edges().find(|reaction| reaction.id() == id)
    }

    pub fn species(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }

    pub fn compartments(&self) -> impl Iterator<Item = &str> {
        self.compartments.iter().map(String::as_str)
    }

    pub fn num_complexes(&self) -> usize {
        self.graph.node_count()
    }

    pub fn num_reactions(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn num_species(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// The linkage classes: the weakly connected components of the complex graph.
    pub fn linkage_classes(&self) -> Result<&Partition<Complex>> {
        if let Some(classes) = self.linkage_classes.get() {
            return Ok(classes);
        }
        let classes = weak_components(&self.graph)?;
        debug!(
            "Found {} linkage classes over {} complexes",
            classes.len(),
            self.num_complexes()
        );
        Ok(self.linkage_classes.get_or_init(|| classes))
    }

    /// The strong linkage classes: the strongly connected components of the complex graph.
    pub fn strong_linkage_classes(&self) -> Result<&Partition<Complex>> {
        if let Some(classes) = self.strong_linkage_classes.get() {
            return Ok(classes);
        }
        let classes = strong_components(&self.graph)?;
        debug!(
            "Found {} strong linkage classes over {} complexes",
            classes.len(),
            self.num_complexes()
        );
        Ok(self.strong_linkage_classes.get_or_init(|| classes))
    }

    /// Whether no reaction leaves the class: every forward neighbor of its complexes is inside it.
    /// An empty class is terminal.
    pub fn is_terminal(&self, class: &BTreeSet<Complex>) -> bool {
        class.iter().all(|complex| {
            self.graph
                .forward_neighbors(complex)
                .all(|neighbor| class.contains(neighbor))
        })
    }

    pub fn terminal_strong_linkage_classes(&self) -> Result<Vec<&BTreeSet<Complex>>> {
        Ok(self
            .strong_linkage_classes()?
            .iter()
            .filter(|class| self.is_terminal(class))
            .collect())
    }

    /// The complexes lying in non-terminal strong linkage classes, sorted.
    pub fn non_terminal_complexes(&self) -> Result<Vec<&Complex>> {
        Ok(self
            .strong_linkage_classes()?
            .iter()
            .filter(|class| !self.is_terminal(class))
            .flatten()
            .sorted()
            .collect())
    }

    /// Whether each linkage class is a single strong linkage class.
    pub fn is_weakly_reversible(&self) -> Result<bool> {
        let strong = self.strong_linkage_classes()?;
        Ok(self
            .linkage_classes()?
            .iter()
            .all(|class| strong.contains_class(class)))
    }

    /// Whether the complexes are equal or a reaction connects them in either direction.
    pub fn is_directly_linked(&self, first: &Complex, second: &Complex) -> bool {
        first == second
            || self
                .graph
                .forward_neighbors(first)
                .chain(self.graph.backward_neighbors(first))
                .any(|neighbor| neighbor == second)
    }

    /// Whether the complexes lie in the same linkage class.
    pub fn is_linked(&self, first: &Complex, second: &Complex) -> Result<bool> {
        Ok(self.linkage_classes()?.are_equivalent(first, second))
    }

    /// Whether the complexes lie in the same strong linkage class.
    pub fn is_strongly_linked(&self, first: &Complex, second: &Complex) -> Result<bool> {
        Ok(self.strong_linkage_classes()?.are_equivalent(first, second))
    }

    /// The reactions whose substrate lies in the class.
    fn reactions_leaving<'t>(
        &'t self,
        class: &'t BTreeSet<Complex>,
    ) -> impl Iterator<Item = &'t Reaction> {
        class
            .iter()
            .flat_map(move |complex| self.graph.edges_out(complex))
    }

    /// Whether removing the reactions directly connecting the two complexes
    /// splits their linkage class into more than one linkage class.
    ///
    /// Complexes left without any reaction count as their own linkage class.
    pub fn is_cut_pair(&self, first: &Complex, second: &Complex) -> Result<bool> {
        if !self.is_directly_linked(first, second) {
            return Err(CrntError::NotDirectlyLinked {
                first: first.to_string(),
                second: second.to_string(),
            });
        }
        let Some(class) = self.linkage_classes()?.equivalence_class_of(first) else {
            return Ok(false);
        };
        let connects = |reaction: &Reaction| {
            (reaction.substrate() == first && reaction.product() == second)
                || (reaction.substrate() == second && reaction.product() == first)
        };
        let remainder: ReactionNetwork = self
            .reactions_leaving(class)
            .filter(|reaction| !connects(*reaction))
            .cloned()
            .collect();

        let isolated = [first, second]
            .into_iter()
            .dedup()
            .filter(|complex| !remainder.graph.contains_node(complex))
            .count();
        let components = remainder.linkage_classes()?.len() + isolated;
        debug!("Removing the link between \"{first}\" and \"{second}\" leaves {components} linkage classes");
        Ok(components > 1)
    }

    /// The stoichiometric matrix, with species rows sorted by id and reaction columns sorted by id.
    pub fn stoichiometric_matrix(&self) -> Result<StoichiometricMatrix> {
        StoichiometricMatrix::new(
            self.species.iter().cloned().collect(),
            self.reactions().into_iter().cloned().collect(),
        )
    }

    /// The deficiency: complexes minus linkage classes minus the rank of the stoichiometric matrix.
    pub fn deficiency(&self, oracle: &impl RankOracle) -> Result<i64> {
        let rank = oracle.rank(&self.stoichiometric_matrix()?)?;
        let deficiency =
            self.num_complexes() as i64 - self.linkage_classes()?.len() as i64 - rank as i64;
        debug!("Deficiency {deficiency} with stoichiometric rank {rank}");
        Ok(deficiency)
    }

    /// The species in which some pair of non-terminal complexes differ, and in nothing else.
    ///
    /// For a deficiency one network, such a species is a candidate for absolute
    /// concentration robustness. This is a necessary-condition heuristic and not a proof.
    /// Networks of any other deficiency have no candidates.
    pub fn acr_candidates(&self, oracle: &impl RankOracle) -> Result<BTreeSet<Species>> {
        if self.deficiency(oracle)? != 1 {
            return Ok(BTreeSet::new());
        }
        let candidates = self
            .non_terminal_complexes()?
            .into_iter()
            .tuple_combinations()
            .filter_map(|(a, b)| match a.differing_species(b).as_slice() {
                [species] => Some((*species).clone()),
                _ => None,
            })
            .collect();
        Ok(candidates)
    }

    pub fn has_acr(&self, oracle: &impl RankOracle) -> Result<bool> {
        Ok(!self.acr_candidates(oracle)?.is_empty())
    }

    /// Finds a shortest chain of reactions connecting `subset1` to `subset2`
    /// using only complexes of `superset`.
    ///
    /// Reactions internal to either subset are dropped from the result.
    /// Returns an empty network if the subsets are not connected.
    pub fn shortest_path_between_complex_sets(
        &self,
        subset1: &BTreeSet<Complex>,
        subset2: &BTreeSet<Complex>,
        superset: &BTreeSet<Complex>,
        directed: bool,
    ) -> Result<ReactionNetwork> {
        if !subset1.is_subset(superset) || !subset2.is_subset(superset) {
            return Err(CrntError::NotASuperset);
        }
        let allowed: FxHashSet<Complex> = superset.iter().cloned().collect();
        let mut scratch = self.graph.induced_subgraph(&allowed);

        let source = Complex::single(Species::new(PSEUDO_SOURCE)?);
        let sink = Complex::single(Species::new(PSEUDO_SINK)?);
        for complex in subset1 {
            scratch.add_edge(Reaction::simple(
                format!("{PSEUDO_SOURCE}{complex}"),
                source.clone(),
                complex.clone(),
            )?);
        }
        for complex in subset2 {
            scratch.add_edge(Reaction::simple(
                format!("{PSEUDO_SINK}{complex}"),
                complex.clone(),
                sink.clone(),
            )?);
        }

        let Some(path) = scratch.dijkstra(&source, &sink, directed) else {
            debug!("No path connects the complex sets");
            return Ok(ReactionNetwork::new());
        };
        let is_pseudo = |complex: &Complex| complex == &source || complex == &sink;
        let within = |subset: &BTreeSet<Complex>, reaction: &Reaction| {
            subset.contains(reaction.substrate()) && subset.contains(reaction.product())
        };
        Ok(path
            .into_iter()
            .filter(|reaction| !is_pseudo(reaction.substrate()) && !is_pseudo(reaction.product()))
            .filter(|reaction| !within(subset1, *reaction) && !within(subset2, *reaction))
            .cloned()
            .collect())
    }

    /// Splits the network into one network per linkage class.
    pub fn linkage_classes_as_networks(&self) -> Result<Vec<ReactionNetwork>> {
        Ok(self
            .linkage_classes()?
            .iter()
            .map(|class| self.reactions_leaving(class).cloned().collect())
            .collect())
    }

    /// Splits the network into one network per strong linkage class,
    /// keeping only the reactions internal to each class.
    pub fn strong_linkage_classes_as_networks(&self) -> Result<Vec<ReactionNetwork>> {
        Ok(self
            .strong_linkage_classes()?
            .iter()
            .map(|class| {
                self.reactions_leaving(class)
                    .filter(|reaction| class.contains(reaction.product()))
                    .cloned()
                    .collect()
            })
            .collect())
    }
}

impl FromIterator<Reaction> for ReactionNetwork {
    fn from_iter<T: IntoIterator<Item = Reaction>>(iter: T) -> Self {
        ReactionNetwork::from_reactions(iter)
    }
}

impl Extend<Reaction> for ReactionNetwork {
    fn extend<T: IntoIterator<Item = Reaction>>(&mut self, iter: T) {
        for reaction in iter {
            self.add_reaction(reaction);
        }
    }
}

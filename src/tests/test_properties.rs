use itertools::Itertools;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    connectivity::reachable,
    tests::{complex, single},
    Complex, Reaction, ReactionNetwork,
};

/// The number of random networks each property is checked on.
const NETWORK_COUNT: u64 = 200;

/// Generates a random network over single-species and two-species complexes.
fn random_network(seed: u64) -> ReactionNetwork {
    let rng = &mut StdRng::seed_from_u64(seed);
    let species_count = rng.random_range(2..12);
    let complexes: Vec<Complex> = (0..species_count)
        .map(|idx| {
            if rng.random_bool(0.3) {
                let name = format!("X{idx}");
                let other = format!("X{}", rng.random_range(0..species_count));
                complex(&[(name.as_str(), 1.), (other.as_str(), 1.)])
            } else {
                single(&format!("X{idx}"))
            }
        })
        .collect();
    let reaction_count = rng.random_range(1..2 * species_count);
    let mut network = ReactionNetwork::new();
    for idx in 0..reaction_count {
        let substrate = complexes[rng.random_range(0..complexes.len())].clone();
        let product = complexes[rng.random_range(0..complexes.len())].clone();
        network.add_reaction(Reaction::simple(format!("R{idx}"), substrate, product).unwrap());
    }
    network
}

fn networks() -> impl Iterator<Item = ReactionNetwork> {
    (0..NETWORK_COUNT).map(random_network)
}

#[test]
pub fn test_linkage_classes_cover_the_nodes() {
    for net in networks() {
        let classes = net.linkage_classes().unwrap();
        let covered = classes.basic_set().collect_vec();
        assert_eq!(covered, net.complexes());
        let total: usize = classes.iter().map(|class| class.len()).sum();
        assert_eq!(total, net.num_complexes());
    }
}

#[test]
pub fn test_strong_classes_refine_linkage_classes() {
    for net in networks() {
        let strong = net.strong_linkage_classes().unwrap();
        assert!(strong.is_finer_than(net.linkage_classes().unwrap()).unwrap());
    }
}

#[test]
pub fn test_strong_classes_are_mutually_reachable_sets() {
    for net in networks() {
        let graph = net.graph();
        let strong = net.strong_linkage_classes().unwrap();
        for a in graph.nodes() {
            let from_a = reachable(a, |node| graph.forward_neighbors(node));
            for b in graph.nodes() {
                let from_b = reachable(b, |node| graph.forward_neighbors(node));
                let mutual = from_a.contains(b) && from_b.contains(a);
                assert_eq!(strong.are_equivalent(a, b), mutual);
            }
        }
    }
}

#[test]
pub fn test_terminal_classes_have_no_escape() {
    for net in networks() {
        let terminal = net.terminal_strong_linkage_classes().unwrap();
        // Every nonempty finite graph has at least one terminal strongly connected component.
        // Networks drawn with only self-loops end up empty.
        assert_eq!(terminal.is_empty(), net.is_empty());
        for class in terminal {
            for node in class {
                assert!(net
                    .graph()
                    .forward_neighbors(node)
                    .all(|neighbor| class.contains(neighbor)));
            }
        }
    }
}

#[test]
pub fn test_weak_reversibility_matches_partition_equality() {
    for net in networks() {
        let same = net.linkage_classes().unwrap() == net.strong_linkage_classes().unwrap();
        assert_eq!(net.is_weakly_reversible().unwrap(), same);
    }
}

#[test]
pub fn test_classes_are_idempotent() {
    for net in networks() {
        let first = net.linkage_classes().unwrap().clone();
        assert_eq!(&first, net.linkage_classes().unwrap());
        let rebuilt = ReactionNetwork::from_reactions(net.reactions().into_iter().cloned());
        assert_eq!(&first, rebuilt.linkage_classes().unwrap());
        assert_eq!(
            net.strong_linkage_classes().unwrap(),
            rebuilt.strong_linkage_classes().unwrap()
        );
    }
}

#[test]
pub fn test_removing_every_reaction_empties_the_network() {
    for mut net in networks() {
        let reactions = net.reactions().into_iter().cloned().collect_vec();
        let half = reactions.len() / 2;
        for reaction in &reactions[..half] {
            assert!(net.remove_reaction(reaction));
        }
        let expected = ReactionNetwork::from_reactions(reactions[half..].iter().cloned());
        assert_eq!(
            net.linkage_classes().unwrap(),
            expected.linkage_classes().unwrap()
        );
        assert_eq!(
            net.species().collect_vec(),
            expected.species().collect_vec()
        );
        for reaction in &reactions[half..] {
            assert!(net.remove_reaction(reaction));
        }
        assert_eq!(net.num_complexes(), 0);
        assert_eq!(net.num_species(), 0);
        assert!(net.linkage_classes().unwrap().is_empty());
    }
}

//! Equivalence classes of graph nodes under weak and strong connectivity.
//!
//! Every traversal uses an explicit stack and a visited set local to the run,
//! so arbitrarily long chains are safe and repeated queries over the same graph are independent.

use std::{collections::BTreeSet, hash::Hash};

use rustc_hash::FxHashSet;

use crate::{complex::Complex, error::Result, partition::Partition, reaction_graph::ReactionGraph};

/// Returns every node reachable from `start` by repeatedly following `neighbors`, `start` included.
pub fn reachable<'g, T, F, I>(start: &'g T, neighbors: F) -> FxHashSet<&'g T>
where
    T: Eq + Hash + ?Sized,
    F: Fn(&'g T) -> I,
    I: IntoIterator<Item = &'g T>,
{
    let mut visited = FxHashSet::default();
    let mut stack = vec![start];
    visited.insert(start);
    while let Some(node) = stack.pop() {
        for next in neighbors(node) {
            if visited.insert(next) {
                stack.push(next);
            }
        }
    }
    visited
}

/// Partitions `nodes` into the classes of nodes reachable from each other through `neighbors`.
///
/// `neighbors` must describe a symmetric relation, such as undirected adjacency.
pub fn connected_components<'g, T, F, I>(
    nodes: impl IntoIterator<Item = &'g T>,
    neighbors: F,
) -> Result<Partition<T>>
where
    T: Ord + Hash + Clone + 'g,
    F: Fn(&'g T) -> I,
    I: IntoIterator<Item = &'g T>,
{
    let mut partition = Partition::new();
    for node in nodes {
        if partition.contains(node) {
            continue;
        }
        let class: BTreeSet<T> = reachable(node, &neighbors).into_iter().cloned().collect();
        partition.add_equivalence_class(class)?;
    }
    Ok(partition)
}

/// Partitions `nodes` into classes of mutually reachable nodes, in time linear in the graph size.
///
/// Kosaraju's algorithm: a depth-first search through `forward` orders the nodes by finishing time,
/// then each node taken in reverse finishing order collects, through `backward`,
/// the nodes not yet assigned to a class.
/// Nodes only reachable backward from outside `nodes` are left out.
pub fn strongly_connected_components<'g, T, F, B, I, J>(
    nodes: impl IntoIterator<Item = &'g T>,
    forward: F,
    backward: B,
) -> Result<Partition<T>>
where
    T: Ord + Hash + Clone + 'g,
    F: Fn(&'g T) -> I,
    B: Fn(&'g T) -> J,
    I: IntoIterator<Item = &'g T>,
    J: IntoIterator<Item = &'g T>,
{
    let mut visited = FxHashSet::default();
    let mut finished = Vec::new();
    for root in nodes {
        if !visited.insert(root) {
            continue;
        }
        let mut stack = vec![(root, forward(root).into_iter())];
        while let Some((node, successors)) = stack.last_mut() {
            match successors.find(|next| !visited.contains(next)) {
                Some(next) => {
                    visited.insert(next);
                    stack.push((next, forward(next).into_iter()));
                }
                None => {
                    finished.push(*node);
                    stack.pop();
                }
            }
        }
    }

    let mut partition = Partition::new();
    let mut assigned = FxHashSet::default();
    for &root in finished.iter().rev() {
        if !assigned.insert(root) {
            continue;
        }
        let mut class = BTreeSet::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            class.insert(node.clone());
            for previous in backward(node) {
                if visited.contains(previous) && assigned.insert(previous) {
                    stack.push(previous);
                }
            }
        }
        partition.add_equivalence_class(class)?;
    }
    Ok(partition)
}

/// The linkage classes of the graph: its weakly connected components.
pub fn weak_components(graph: &ReactionGraph) -> Result<Partition<Complex>> {
    let mut nodes: Vec<&Complex> = graph.nodes().collect();
    nodes.sort();
    connected_components(nodes, |node| graph.undirected_neighbors(node))
}

/// The strong linkage classes of the graph: its strongly connected components.
pub fn strong_components(graph: &ReactionGraph) -> Result<Partition<Complex>> {
    let mut nodes: Vec<&Complex> = graph.nodes().collect();
    nodes.sort();
    strongly_connected_components(
        nodes,
        |node| graph.forward_neighbors(node),
        |node| graph.backward_neighbors(node),
    )
}

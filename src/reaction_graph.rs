use std::{cmp::Reverse, collections::hash_map::Entry};

use dary_heap::OctonaryHeap;
use itertools::Itertools;
use log::{trace, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{complex::Complex, reaction::Reaction};

/// Counts how many parallel edges connect a node to each of its neighbors.
type NeighborCounts = FxHashMap<Complex, usize>;

/// The directed multigraph of complexes and reactions, with incrementally updated adjacency indices.
#[derive(Clone, Debug, Default)]
pub struct ReactionGraph {
    nodes: FxHashSet<Complex>,
    edges: FxHashSet<Reaction>,
    /// The reactions having each complex as their substrate.
    out_edges: FxHashMap<Complex, FxHashSet<Reaction>>,
    /// The reactions having each complex as their product.
    in_edges: FxHashMap<Complex, FxHashSet<Reaction>>,
    forward_neighbors: FxHashMap<Complex, NeighborCounts>,
    backward_neighbors: FxHashMap<Complex, NeighborCounts>,
}

fn increment(counts: &mut FxHashMap<Complex, NeighborCounts>, node: &Complex, neighbor: &Complex) {
    *counts
        .entry(node.clone())
        .or_default()
        .entry(neighbor.clone())
        .or_default() += 1;
}

fn decrement(counts: &mut FxHashMap<Complex, NeighborCounts>, node: &Complex, neighbor: &Complex) {
    let Some(neighbors) = counts.get_mut(node) else {
        return;
    };
    if let Entry::Occupied(mut entry) = neighbors.entry(neighbor.clone()) {
        *entry.get_mut() -= 1;
        if *entry.get() == 0 {
            entry.remove();
        }
    }
    if neighbors.is_empty() {
        counts.remove(node);
    }
}

fn remove_indexed_edge(
    index: &mut FxHashMap<Complex, FxHashSet<Reaction>>,
    node: &Complex,
    edge: &Reaction,
) {
    if let Some(edges) = index.get_mut(node) {
        edges.remove(edge);
        if edges.is_empty() {
            index.remove(node);
        }
    }
}

impl ReactionGraph {
    pub fn new() -> ReactionGraph {
        ReactionGraph::default()
    }

    /// Adds an edge and its endpoints to the graph.
    /// Returns false if the edge is a self-loop or is already in the graph.
    pub fn add_edge(&mut self, reaction: Reaction) -> bool {
        if reaction.is_self_loop() {
            warn!("Rejected the reaction \"{reaction}\": its substrate equals its product");
            return false;
        }
        if self.edges.contains(&reaction) {
            return false;
        }
        let (source, sink) = (reaction.substrate().clone(), reaction.product().clone());
        trace!("Adding the edge \"{reaction}\"");

        increment(&mut self.forward_neighbors, &source, &sink);
        increment(&mut self.backward_neighbors, &sink, &source);
        self.out_edges
            .entry(source.clone())
            .or_default()
            .insert(reaction.clone());
        self.in_edges
            .entry(sink.clone())
            .or_default()
            .insert(reaction.clone());
        self.nodes.insert(source);
        self.nodes.insert(sink);
        self.edges.insert(reaction);
        true
    }

    /// Removes an edge, and any endpoint no longer adjacent to an edge.
    /// Returns false if the edge was not in the graph.
    pub fn remove_edge(&mut self, reaction: &Reaction) -> bool {
        if !self.edges.remove(reaction) {
            return false;
        }
        let (source, sink) = (reaction.substrate(), reaction.product());
        trace!("Removing the edge \"{reaction}\"");

        decrement(&mut self.forward_neighbors, source, sink);
        decrement(&mut self.backward_neighbors, sink, source);
        remove_indexed_edge(&mut self.out_edges, source, reaction);
        remove_indexed_edge(&mut self.in_edges, sink, reaction);
        for node in [source, sink] {
            if !self.out_edges.contains_key(node) && !self.in_edges.contains_key(node) {
                self.nodes.remove(node);
            }
        }
        true
    }

    pub fn contains_node(&self, node: &Complex) -> bool {
        self.nodes.contains(node)
    }

    pub fn contains_edge(&self, reaction: &Reaction) -> bool {
        self.edges.contains(reaction)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Complex> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Reaction> {
        self.edges.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the reactions leaving the node.
    pub fn edges_out<'t>(&'t self, node: &Complex) -> impl Iterator<Item = &'t Reaction> {
        self.out_edges.get(node).into_iter().flatten()
    }

    /// Returns the reactions entering the node.
    pub fn edges_in<'t>(&'t self, node: &Complex) -> impl Iterator<Item = &'t Reaction> {
        self.in_edges.get(node).into_iter().flatten()
    }

    /// Returns the reactions entering or leaving the node.
    pub fn edges_incident<'t>(&'t self, node: &Complex) -> impl Iterator<Item = &'t Reaction> {
        // Without self-loops the incoming and outgoing edges are disjoint.
        self.edges_out(node).chain(self.edges_in(node))
    }

    pub fn forward_neighbors<'t>(&'t self, node: &Complex) -> impl Iterator<Item = &'t Complex> {
        self.forward_neighbors
            .get(node)
            .into_iter()
            .flat_map(|neighbors| neighbors.keys())
    }

    pub fn backward_neighbors<'t>(&'t self, node: &Complex) -> impl Iterator<Item = &'t Complex> {
        self.backward_neighbors
            .get(node)
            .into_iter()
            .flat_map(|neighbors| neighbors.keys())
    }

    /// Returns the neighbors of the node in either direction, without repetitions.
    pub fn undirected_neighbors<'t>(&'t self, node: &Complex) -> impl Iterator<Item = &'t Complex> {
        self.forward_neighbors(node)
            .chain(self.backward_neighbors(node))
            .unique()
    }

    /// Returns the subgraph made of the edges with both endpoints in `nodes`.
    pub fn induced_subgraph(&self, nodes: &FxHashSet<Complex>) -> ReactionGraph {
        let mut subgraph = ReactionGraph::new();
        for edge in &self.edges {
            if nodes.contains(edge.substrate()) && nodes.contains(edge.product()) {
                subgraph.add_edge(edge.clone());
            }
        }
        subgraph
    }

    /// The edges that can be followed from the node, with the node they lead to.
    /// Sorted so that ties between equally short paths are broken deterministically.
    fn steps<'t>(&'t self, node: &Complex, directed: bool) -> Vec<(&'t Complex, &'t Reaction)> {
        let forward = self.edges_out(node).map(|edge| (edge.product(), edge));
        let backward = self
            .edges_in(node)
            .filter(move |_| !directed)
            .map(|edge| (edge.substrate(), edge));
        forward.chain(backward).sorted().collect()
    }

    /// Finds a shortest path from `source` to `sink`, where every edge has unit weight.
    /// Returns the edges along the path in order, or `None` if the sink is unreachable.
    /// If `directed` is false, edges may also be followed from product to substrate.
    pub fn dijkstra(&self, source: &Complex, sink: &Complex, directed: bool) -> Option<Vec<&Reaction>> {
        let source = self.nodes.get(source)?;
        let sink = self.nodes.get(sink)?;

        let mut distance: FxHashMap<&Complex, usize> = FxHashMap::default();
        let mut reached_by: FxHashMap<&Complex, &Reaction> = FxHashMap::default();
        let mut heap = OctonaryHeap::new();
        distance.insert(source, 0);
        heap.push(Reverse((0, source)));

        while let Some(Reverse((dist, node))) = heap.pop() {
            if node == sink {
                break;
            }
            if distance.get(node).is_some_and(|&best| best < dist) {
                continue;
            }
            for (next, edge) in self.steps(node, directed) {
                if distance.get(next).is_none_or(|&best| dist + 1 < best) {
                    distance.insert(next, dist + 1);
                    reached_by.insert(next, edge);
                    heap.push(Reverse((dist + 1, next)));
                }
            }
        }

        if !distance.contains_key(sink) {
            return None;
        }
        let mut path = Vec::new();
        let mut node = sink;
        while node != source {
            let edge = *reached_by.get(node)?;
            path.push(edge);
            node = if edge.product() == node {
                edge.substrate()
            } else {
                edge.product()
            };
        }
        path.reverse();
        Some(path)
    }
}

use std::collections::BTreeSet;

use crate::connectivity::{connected_components, reachable, strongly_connected_components};

/// Builds forward and backward adjacency lists from directed edges.
fn adjacency(n: usize, edges: &[(usize, usize)]) -> (Vec<Vec<usize>>, Vec<Vec<usize>>) {
    let mut forward = vec![Vec::new(); n];
    let mut backward = vec![Vec::new(); n];
    for &(from, to) in edges {
        forward[from].push(to);
        backward[to].push(from);
    }
    (forward, backward)
}

fn class(elements: &[usize]) -> BTreeSet<usize> {
    elements.iter().copied().collect()
}

#[test]
pub fn test_reachable_includes_start_and_handles_cycles() {
    let (forward, _) = adjacency(4, &[(0, 1), (1, 2), (2, 0)]);
    let reached = reachable(&0, |n: &usize| forward[*n].iter());
    assert_eq!(reached.len(), 3);
    assert!(!reached.contains(&3));
}

#[test]
pub fn test_weak_and_strong_components() {
    // 0 <-> 1 -> 2, 3 -> 4, 5 isolated
    let (forward, backward) = adjacency(6, &[(0, 1), (1, 0), (1, 2), (3, 4)]);
    let nodes: Vec<usize> = (0..6).collect();
    let undirected = |n: &usize| forward[*n].iter().chain(backward[*n].iter());

    let weak = connected_components(nodes.iter(), undirected).unwrap();
    assert_eq!(weak.len(), 3);
    assert!(weak.contains_class(&class(&[0, 1, 2])));
    assert!(weak.contains_class(&class(&[3, 4])));
    assert!(weak.contains_class(&class(&[5])));

    let strong = strongly_connected_components(
        nodes.iter(),
        |n: &usize| forward[*n].iter(),
        |n: &usize| backward[*n].iter(),
    )
    .unwrap();
    assert_eq!(strong.len(), 5);
    assert!(strong.contains_class(&class(&[0, 1])));
    assert!(strong.is_finer_than(&weak).unwrap());
}

/// A long chain must not overflow the stack.
#[test]
pub fn test_long_chain() {
    let n = 1_000_000;
    let edges: Vec<(usize, usize)> = (1..n).map(|i| (i - 1, i)).collect();
    let (forward, backward) = adjacency(n, &edges);
    let nodes: Vec<usize> = (0..n).collect();

    let weak = connected_components(nodes.iter(), |x: &usize| {
        forward[*x].iter().chain(backward[*x].iter())
    })
    .unwrap();
    assert_eq!(weak.len(), 1);

    let descendants = reachable(&0, |x: &usize| forward[*x].iter());
    assert_eq!(descendants.len(), n);

    let strong = strongly_connected_components(
        nodes.iter(),
        |x: &usize| forward[*x].iter(),
        |x: &usize| backward[*x].iter(),
    )
    .unwrap();
    assert_eq!(strong.len(), n);
    assert!(strong.contains_class(&class(&[n - 1])));
}

#[test]
pub fn test_strong_components_of_linked_cycles() {
    // 0 -> 1 -> 2 -> 0 -> 3 -> 4 -> 3, 5 -> 4, 6 -> 6 -> 2
    let (forward, backward) = adjacency(
        7,
        &[(0, 1), (1, 2), (2, 0), (0, 3), (3, 4), (4, 3), (5, 4), (6, 6), (6, 2)],
    );
    // The visiting order must not change the classes.
    for nodes in [(0..7).collect::<Vec<usize>>(), (0..7).rev().collect()] {
        let strong = strongly_connected_components(
            nodes.iter(),
            |n: &usize| forward[*n].iter(),
            |n: &usize| backward[*n].iter(),
        )
        .unwrap();
        assert_eq!(strong.len(), 4);
        assert!(strong.contains_class(&class(&[0, 1, 2])));
        assert!(strong.contains_class(&class(&[3, 4])));
        assert!(strong.contains_class(&class(&[5])));
        assert!(strong.contains_class(&class(&[6])));
    }
}

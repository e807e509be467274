use crate::{Complex, ParseState, Reaction, ReactionNetwork};

mod test_connectivity;
mod test_parsers;
mod test_properties;

/// Builds a complex from species ids and counts.
pub fn complex(items: &[(&str, f64)]) -> Complex {
    Complex::from_ids(items.iter().copied()).unwrap()
}

/// Builds the complex made of a single copy of the species.
pub fn single(id: &str) -> Complex {
    complex(&[(id, 1.)])
}

/// Builds an irreversible reaction between two single-species complexes.
pub fn reaction(id: &str, from: &str, to: &str) -> Reaction {
    Reaction::simple(id, single(from), single(to)).unwrap()
}

/// Builds a network from reaction file contents.
pub fn network(data: &str) -> ReactionNetwork {
    let mut parse_state = ParseState::default();
    parse_state.parse_str(data).unwrap();
    parse_state.get_network().unwrap()
}

use std::path::Path;

use itertools::Itertools;

use crate::{
    tests::{complex, network, single},
    Complex, CrntError, ParseState,
};

fn reaction_ids(data: &str) -> Vec<String> {
    network(data)
        .reactions()
        .iter()
        .map(|reaction| reaction.id().to_owned())
        .collect()
}

#[test]
pub fn test_ids_are_generated() {
    assert_eq!(
        reaction_ids("A -> B\nmine: B -> C\nC <-> D"),
        ["R1", "R3", "R3_rev", "mine"]
    );
}

#[test]
pub fn test_coefficients_and_zero_complex() {
    let net = network("R1: 2A + 0.5 B -> 3C\nR2: 0 -> A\nR3: C ->");
    let r1 = net.reaction("R1").unwrap();
    assert_eq!(r1.substrate(), &complex(&[("A", 2.), ("B", 0.5)]));
    assert_eq!(r1.product(), &complex(&[("C", 3.)]));
    assert_eq!(net.reaction("R2").unwrap().substrate(), &Complex::zero());
    assert_eq!(net.reaction("R3").unwrap().product(), &Complex::zero());
    // 2A + 0.5B, 3C, 0, A and C.
    assert_eq!(net.num_complexes(), 5);
}

#[test]
pub fn test_comments_rates_and_amounts_are_ignored() {
    let data = "# A comment line\n\
                A = 5\n\
                \n\
                A + B -> C, 1.5e-3   # trailing comment\n\
                C => A + B\n";
    let net = network(data);
    assert_eq!(net.num_reactions(), 2);
    assert!(net.is_weakly_reversible().unwrap());
    assert_eq!(
        net.complexes(),
        [&complex(&[("A", 1.), ("B", 1.)]), &single("C")]
    );
}

#[test]
pub fn test_parse_error_reports_line() {
    let mut parse_state = ParseState::default();
    let res = parse_state.parse_str("A -> B\nA + -> B");
    assert!(matches!(res, Err(CrntError::Parse { line: 2, .. })));

    let mut parse_state = ParseState::default();
    assert!(parse_state.parse_str("A -> B -> C").is_err());
}

#[test]
pub fn test_missing_file() {
    let mut parse_state = ParseState::default();
    let res = parse_state.parse_data_file(Path::new("data/test_models/missing.txt"));
    assert!(matches!(res, Err(CrntError::Io(_))));
}

#[test]
pub fn test_several_files_share_one_network() {
    let mut parse_state = ParseState::default();
    parse_state
        .parse_data_file(Path::new("data/test_models/cycle.txt"))
        .unwrap()
        .parse_str("C -> D")
        .unwrap();
    assert_eq!(parse_state.len(), 4);
    let net = parse_state.get_network().unwrap();
    assert_eq!(net.linkage_classes().unwrap().len(), 1);
    assert_eq!(
        net.reactions().iter().map(|r| r.id()).collect_vec(),
        ["R1", "R2", "R3", "R4"]
    );
}

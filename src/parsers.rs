use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::{debug, warn};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, satisfy, space0},
    combinator::{all_consuming, map, map_res, opt, recognize, success, value},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, preceded, terminated},
    IResult, Parser,
};

use crate::{
    complex::Complex,
    error::{CrntError, Result},
    network::ReactionNetwork,
    reaction::Reaction,
    species::Species,
};

/// The suffix appended to a reaction id to name its inverse.
pub const INVERSE_SUFFIX: &str = "_rev";

/// The result of parsing a line defining a new reaction.
#[derive(Clone, Debug)]
struct NamedReaction {
    id: Option<String>,
    substrate: Vec<(String, f64)>,
    product: Vec<(String, f64)>,
    reversible: bool,
}

/// An enum storing the result of parsing a line.
#[derive(Clone, Debug)]
enum Line {
    /// An initial amount, as used by kinetic simulators. Irrelevant to the network structure.
    Amount(String),
    Reaction(NamedReaction),
}

/// Accumulates the reactions of one or more reaction files.
#[derive(Default)]
pub struct ParseState {
    /// The parsed reactions, with the line each was read from.
    reactions: Vec<(usize, NamedReaction)>,
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A parser for species names, which cannot start with a digit.
fn species_name(data: &str) -> IResult<&str, &str> {
    recognize((
        satisfy(|c| c.is_alphabetic() || c == '_'),
        take_while(is_name_char),
    ))
    .parse(data)
}

/// A parser for a nonnegative decimal coefficient such as `2` or `0.5`.
fn coefficient(data: &str) -> IResult<&str, f64> {
    map_res(recognize((digit1, opt((char('.'), digit1)))), |s: &str| {
        s.parse::<f64>()
    })
    .parse(data)
}

/// Parses a term of the form `2A`, `2 A` or `A`.
fn parse_reaction_item(data: &str) -> IResult<&str, (String, f64)> {
    let (rem, (count, name)) = (opt(terminated(coefficient, space0)), species_name).parse(data)?;
    Ok((rem, (name.to_owned(), count.unwrap_or(1.))))
}

/// Parses one side of a reaction:
/// ```ignore
/// 2A + B
/// ```
/// An empty side, or `0`, is the zero complex.
fn parse_reaction_half(data: &str) -> IResult<&str, Vec<(String, f64)>> {
    alt((
        separated_list1(delimited(space0, tag("+"), space0), parse_reaction_item),
        value(Vec::new(), tag("0")),
        success(Vec::new()),
    ))
    .parse(data)
}

/// Parses the arrow of a reaction, returning whether it is reversible.
fn parse_arrow(data: &str) -> IResult<&str, bool> {
    alt((
        value(true, alt((tag("<->"), tag("<=>")))),
        value(false, alt((tag("->"), tag("=>")))),
    ))
    .parse(data)
}

/// A parser for a full reaction, of the form:
/// ```ignore
/// R1: 2A + B -> 3C, 3.5e-9
/// ```
/// The id and the trailing rate are optional, and the rate is ignored.
fn parse_reaction(data: &str) -> IResult<&str, Line> {
    let id = terminated(take_while1(is_name_char), (space0, char(':'), space0));
    let rate = preceded((space0, char(','), space0), double);
    let (rem, (id, substrate, reversible, product, _)) = (
        opt(id),
        parse_reaction_half,
        delimited(space0, parse_arrow, space0),
        parse_reaction_half,
        opt(rate),
    )
        .parse(data)?;

    let res = NamedReaction {
        id: id.map(str::to_owned),
        substrate,
        product,
        reversible,
    };
    Ok((rem, Line::Reaction(res)))
}

/// Parses a line of the form:
/// ```ignore
/// A = 5
/// ```
fn parse_amount(data: &str) -> IResult<&str, Line> {
    map(
        terminated(species_name, (space0, char('='), space0, double)),
        |name: &str| Line::Amount(name.to_owned()),
    )
    .parse(data)
}

fn parse_line(line: &str) -> IResult<&str, Line> {
    all_consuming(delimited(space0, alt((parse_amount, parse_reaction)), space0)).parse(line)
}

/// Builds a complex from the parsed species names and counts.
fn to_complex(items: &[(String, f64)]) -> Result<Complex> {
    let items: Vec<(Species, f64)> = items
        .iter()
        .map(|(name, count)| Ok((Species::new(name.as_str())?, *count)))
        .collect::<Result<_>>()?;
    Complex::new(items)
}

impl ParseState {
    /// Parses a data file.
    /// The data file contains lines, each of which is either a reaction:
    /// ```ignore
    /// R1: 2A + B -> C
    /// C <-> D
    /// ```
    /// or an initial amount such as `A = 5`, which is ignored.
    /// Everything after a `#` is a comment.
    pub fn parse_data_file(&mut self, reactions_path: &Path) -> Result<&mut Self> {
        debug!("Parsing the reaction file {reactions_path:?}");
        let reader = BufReader::new(File::open(reactions_path)?);
        for (idx, line) in reader.lines().enumerate() {
            self.parse_numbered_line(idx + 1, &line?)?;
        }
        Ok(self)
    }

    /// Parses reaction data held in memory, in the format of [`ParseState::parse_data_file`].
    pub fn parse_str(&mut self, data: &str) -> Result<&mut Self> {
        for (idx, line) in data.lines().enumerate() {
            self.parse_numbered_line(idx + 1, line)?;
        }
        Ok(self)
    }

    fn parse_numbered_line(&mut self, line_number: usize, line: &str) -> Result<()> {
        let content = line.split('#').next().unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(());
        }
        let (_, parsed) = parse_line(content).map_err(|err| CrntError::Parse {
            line: line_number,
            message: format!("\"{}\": {err:?}", content.trim()),
        })?;
        match parsed {
            Line::Amount(name) => {
                warn!("Ignoring the initial amount of \"{name}\" on line {line_number}");
            }
            Line::Reaction(named_reaction) => self.reactions.push((line_number, named_reaction)),
        }
        Ok(())
    }

    /// The number of reactions parsed so far.
    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    /// Gets the reaction network.
    /// Reactions without an id are named `R<n>` after their position among the parsed reactions,
    /// and the inverse of a reversible reaction `id` is named `id_rev`.
    pub fn get_network(self) -> Result<ReactionNetwork> {
        let mut network = ReactionNetwork::new();
        for (idx, (line_number, named_reaction)) in self.reactions.into_iter().enumerate() {
            let id = named_reaction
                .id
                .unwrap_or_else(|| format!("R{}", idx + 1));
            let substrate = to_complex(&named_reaction.substrate)?;
            let product = to_complex(&named_reaction.product)?;
            let reaction = if named_reaction.reversible {
                let inverse_id = format!("{id}{INVERSE_SUFFIX}");
                Reaction::with_inverse(id, inverse_id, substrate, product)?
            } else {
                Reaction::simple(id, substrate, product)?
            };
            if !network.add_reaction(reaction) {
                warn!("The reaction on line {line_number} was not added to the network");
            }
        }
        Ok(network)
    }
}

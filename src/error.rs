use thiserror::Error;

/// The errors raised while building or analyzing a reaction network.
#[derive(Debug, Error)]
pub enum CrntError {
    /// An identifier, name or compartment that must be non-empty was empty.
    #[error("Invalid {kind}: the value must be non-empty")]
    InvalidIdentifier { kind: &'static str },
    /// An occurrence count that is negative, NaN or infinite.
    #[error("Invalid occurrence count {count} for species \"{species}\"")]
    InvalidCount { species: String, count: f64 },
    /// The endpoints of an inverse reaction do not mirror the forward reaction.
    #[error("Reaction \"{inverse}\" is not an inverse of reaction \"{reaction}\"")]
    InconsistentInverse { reaction: String, inverse: String },
    #[error("The equivalence class overlaps a class already in the partition")]
    NotDisjoint,
    #[error("The partitions are built over different basic sets")]
    IncomparableBasicSets,
    #[error("The network has no reactions, so its stoichiometric matrix is empty")]
    EmptyMatrix,
    /// The external rank collaborator failed to produce a value.
    #[error("The rank of the stoichiometric matrix is unavailable: {0}")]
    RankUnavailable(String),
    #[error("The complexes \"{first}\" and \"{second}\" are not directly linked")]
    NotDirectlyLinked { first: String, second: String },
    #[error("The superset does not contain both complex subsets")]
    NotASuperset,
    #[error("Failed to parse line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CrntError>;

use std::{
    cmp::Ordering,
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

use crate::error::{CrntError, Result};

/// The compartment assigned to species that do not declare one.
pub const DEFAULT_COMPARTMENT: &str = "default";

/// A chemical species.
/// Equality, ordering and hashing only consider the id.
#[derive(Clone, Debug)]
pub struct Species {
    id: String,
    name: String,
    compartment: String,
}

fn non_empty(value: String, kind: &'static str) -> Result<String> {
    if value.is_empty() {
        Err(CrntError::InvalidIdentifier { kind })
    } else {
        Ok(value)
    }
}

impl Species {
    /// Creates a species in the default compartment, named after its id.
    pub fn new(id: impl Into<String>) -> Result<Species> {
        let id = non_empty(id.into(), "species id")?;
        Ok(Species {
            name: id.clone(),
            id,
            compartment: DEFAULT_COMPARTMENT.to_owned(),
        })
    }

    pub fn with_details(
        id: impl Into<String>,
        name: impl Into<String>,
        compartment: impl Into<String>,
    ) -> Result<Species> {
        Ok(Species {
            id: non_empty(id.into(), "species id")?,
            name: non_empty(name.into(), "species name")?,
            compartment: non_empty(compartment.into(), "compartment")?,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn compartment(&self) -> &str {
        &self.compartment
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.name = non_empty(name.into(), "species name")?;
        Ok(())
    }

    pub fn set_compartment(&mut self, compartment: impl Into<String>) -> Result<()> {
        self.compartment = non_empty(compartment.into(), "compartment")?;
        Ok(())
    }
}

impl PartialEq for Species {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Species {}

impl PartialOrd for Species {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Species {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for Species {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

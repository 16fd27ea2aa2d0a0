#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a render material bound to a submesh.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Material {
    pub name: String,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Material {
        Material { name: name.into() }
    }
}

impl From<&str> for Material {
    fn from(name: &str) -> Material {
        Material::new(name)
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

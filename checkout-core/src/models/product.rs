use std::fmt;

use serde::{Deserialize, Serialize};

/// A catalog entry the user can put in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
}

impl Product {
    pub fn new(
        id: i64,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Product {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.name)
    }
}

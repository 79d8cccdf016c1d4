use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Numeric identifier of a catalog entity or child item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl EntityId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays() {
        let id: EntityId = " 42 ".parse().unwrap();
        assert_eq!(id, EntityId(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<EntityId>().is_err());
    }

    #[test]
    fn serializes_as_bare_number() {
        assert_eq!(serde_json::to_string(&EntityId(5)).unwrap(), "5");
        let id: EntityId = serde_json::from_str("9").unwrap();
        assert_eq!(id, EntityId(9));
    }
}

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Role declared by a connection when it registers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// Front of house: places new orders.
    Receptionist,
    /// A kitchen station worker. May only advance dishes cooked at this station.
    Station(String),
    /// Reviews newly registered orders.
    ChefManager,
    /// Read-only leaderboard screen.
    RankingDisplay,
}

impl ActorRole {
    pub fn station(name: impl Into<String>) -> Self {
        Self::Station(name.into())
    }

    /// Station name when this role is a kitchen station.
    pub fn station_name(&self) -> Option<&str> {
        match self {
            Self::Station(name) => Some(name),
            _ => None,
        }
    }
}

impl Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Receptionist => write!(f, "receptionist"),
            Self::Station(name) => write!(f, "station:{name}"),
            Self::ChefManager => write!(f, "chef_manager"),
            Self::RankingDisplay => write!(f, "ranking_display"),
        }
    }
}

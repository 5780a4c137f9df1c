//! Resource kinds served by the engine

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// The closed set of resource kinds.
///
/// Every stage of the pipeline selects its behaviour with an exhaustive
/// `match` on this enum, so adding a kind is a compile error until the
/// resolver and a normalizer exist for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    Drama,
    Cast,
    Episodes,
    Episode,
    Recommendations,
    Reviews,
    Person,
    UserDramalist,
    CuratedList,
    Threads,
    SeasonalCalendar,
    Search,
}

impl ResourceKind {
    pub const ALL: [Self; 12] = [
        Self::Drama,
        Self::Cast,
        Self::Episodes,
        Self::Episode,
        Self::Recommendations,
        Self::Reviews,
        Self::Person,
        Self::UserDramalist,
        Self::CuratedList,
        Self::Threads,
        Self::SeasonalCalendar,
        Self::Search,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Drama => "drama",
            Self::Cast => "cast",
            Self::Episodes => "episodes",
            Self::Episode => "episode",
            Self::Recommendations => "recommendations",
            Self::Reviews => "reviews",
            Self::Person => "person",
            Self::UserDramalist => "userDramalist",
            Self::CuratedList => "curatedList",
            Self::Threads => "threads",
            Self::SeasonalCalendar => "seasonalCalendar",
            Self::Search => "search",
        }
    }

    /// Kinds answered by the upstream's JSON API rather than rendered pages
    #[must_use]
    pub const fn is_json_api(&self) -> bool {
        matches!(self, Self::Threads | Self::SeasonalCalendar)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ResolveError::Invalid(format!("unknown resource kind '{s}'")))
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Leaderboard a ranking row belongs to. The display form is what gets stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankingCategory {
    #[serde(rename = "Top Gainers")]
    TopGainers,
    #[serde(rename = "Top Losers")]
    TopLosers,
    #[serde(rename = "Most Actively Traded")]
    MostActive,
}

impl RankingCategory {
    pub const ALL: [RankingCategory; 3] = [
        RankingCategory::TopGainers,
        RankingCategory::TopLosers,
        RankingCategory::MostActive,
    ];
}

impl fmt::Display for RankingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankingCategory::TopGainers => write!(f, "Top Gainers"),
            RankingCategory::TopLosers => write!(f, "Top Losers"),
            RankingCategory::MostActive => write!(f, "Most Actively Traded"),
        }
    }
}

impl FromStr for RankingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "top gainers" | "gainers" => Ok(RankingCategory::TopGainers),
            "top losers" | "losers" => Ok(RankingCategory::TopLosers),
            "most actively traded" | "most active" | "active" => Ok(RankingCategory::MostActive),
            _ => Err(format!("Unknown ranking category: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trips_through_from_str() {
        for cat in RankingCategory::ALL {
            assert_eq!(cat.to_string().parse::<RankingCategory>(), Ok(cat));
        }
    }

    #[test]
    fn test_short_aliases() {
        assert_eq!("gainers".parse::<RankingCategory>(), Ok(RankingCategory::TopGainers));
        assert_eq!("LOSERS".parse::<RankingCategory>(), Ok(RankingCategory::TopLosers));
        assert!("sideways".parse::<RankingCategory>().is_err());
    }
}

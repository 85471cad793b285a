use serde::{Deserialize, Serialize};

/// Static company facts. Every field is fill-once: the store only writes a
/// field while its stored value is still empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticProfile {
    pub name: String,
    pub sector: String,
    pub industry: String,
    pub description: String,
    pub website: String,
    pub country: String,
    pub employees: i64,
    pub logo: String,
    pub ipo_date: String,
    pub ceo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Security {
    pub id: i64,
    pub ticker: String,
    #[serde(flatten)]
    pub profile: StaticProfile,
}

impl Security {
    /// A security whose name was never filled in has not been enriched yet.
    pub fn is_enriched(&self) -> bool {
        !self.profile.name.is_empty()
    }

    /// Name for display, falling back to the ticker.
    pub fn display_name(&self) -> &str {
        if self.profile.name.is_empty() {
            &self.ticker
        } else {
            &self.profile.name
        }
    }
}

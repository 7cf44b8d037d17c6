use serde::{Deserialize, Serialize};

/// A named extracurricular offering together with its roster.
///
/// `participants` keeps insertion order. Uniqueness of emails inside a roster
/// is maintained by the catalog, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl Activity {
    pub fn is_enrolled(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }

    /// Capacity is informational only; this may go negative in practice
    /// because signups are never rejected for being over capacity.
    pub fn spots_left(&self) -> i64 {
        i64::from(self.max_participants) - self.participants.len() as i64
    }
}

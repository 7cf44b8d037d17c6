use std::{collections::HashSet, fs, path::Path, sync::Arc};

use anyhow::{Context, Result};
use serde::Deserialize;
use shared::{domain::Activity, protocol::ActivityCatalog};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

pub mod seed;

/// In-memory activity catalog shared by every request handler.
///
/// Cloning is cheap and yields another handle to the same state. Each roster
/// mutation runs its membership check and its write under one lock, so
/// concurrent signups for the same email cannot both succeed.
#[derive(Clone)]
pub struct Catalog {
    activities: Arc<RwLock<Vec<Activity>>>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("activity name must not be empty")]
    EmptyName,
    #[error("duplicate activity '{0}'")]
    DuplicateActivity(String),
    #[error("activity '{0}' must allow at least one participant")]
    ZeroCapacity(String),
    #[error("activity '{activity}' lists '{email}' more than once")]
    DuplicateParticipant { activity: String, email: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("activity '{0}' does not exist")]
    UnknownActivity(String),
    #[error("'{email}' is already enrolled in '{activity}'")]
    AlreadyEnrolled { activity: String, email: String },
    #[error("'{email}' is not enrolled in '{activity}'")]
    NotEnrolled { activity: String, email: String },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "activity")]
    activities: Vec<Activity>,
}

impl Catalog {
    pub fn new(activities: Vec<Activity>) -> Result<Self, CatalogError> {
        validate(&activities)?;
        Ok(Self {
            activities: Arc::new(RwLock::new(activities)),
        })
    }

    pub fn seeded() -> Self {
        Self {
            activities: Arc::new(RwLock::new(seed::default_activities())),
        }
    }

    /// Parses `[[activity]]` tables and validates them like [`Catalog::new`].
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(raw).context("catalog file is not valid TOML")?;
        Ok(Self::new(file.activities)?)
    }

    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog file '{}'", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("failed to load catalog file '{}'", path.display()))
    }

    pub async fn list_all(&self) -> ActivityCatalog {
        ActivityCatalog::new(self.activities.read().await.clone())
    }

    pub async fn get(&self, name: &str) -> Option<Activity> {
        self.activities
            .read()
            .await
            .iter()
            .find(|a| a.name == name)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.activities.read().await.len()
    }

    pub async fn add_participant(&self, name: &str, email: &str) -> Result<(), RosterError> {
        let mut activities = self.activities.write().await;
        let activity = find_mut(&mut activities, name)?;
        if activity.is_enrolled(email) {
            return Err(RosterError::AlreadyEnrolled {
                activity: name.to_string(),
                email: email.to_string(),
            });
        }
        activity.participants.push(email.to_string());
        debug!(
            activity = name,
            email,
            roster_len = activity.participants.len(),
            "participant added"
        );
        Ok(())
    }

    pub async fn remove_participant(&self, name: &str, email: &str) -> Result<(), RosterError> {
        let mut activities = self.activities.write().await;
        let activity = find_mut(&mut activities, name)?;
        let Some(position) = activity.participants.iter().position(|p| p == email) else {
            return Err(RosterError::NotEnrolled {
                activity: name.to_string(),
                email: email.to_string(),
            });
        };
        activity.participants.remove(position);
        debug!(
            activity = name,
            email,
            roster_len = activity.participants.len(),
            "participant removed"
        );
        Ok(())
    }
}

fn find_mut<'a>(
    activities: &'a mut [Activity],
    name: &str,
) -> Result<&'a mut Activity, RosterError> {
    activities
        .iter_mut()
        .find(|a| a.name == name)
        .ok_or_else(|| RosterError::UnknownActivity(name.to_string()))
}

fn validate(activities: &[Activity]) -> Result<(), CatalogError> {
    let mut names = HashSet::new();
    for activity in activities {
        if activity.name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if !names.insert(activity.name.as_str()) {
            return Err(CatalogError::DuplicateActivity(activity.name.clone()));
        }
        if activity.max_participants == 0 {
            return Err(CatalogError::ZeroCapacity(activity.name.clone()));
        }
        let mut emails = HashSet::new();
        for email in &activity.participants {
            if !emails.insert(email.as_str()) {
                return Err(CatalogError::DuplicateParticipant {
                    activity: activity.name.clone(),
                    email: email.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

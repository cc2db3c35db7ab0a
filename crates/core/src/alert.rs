//! Alert rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::AlertId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub name: String,
    pub query: String,
    pub threshold: f64,
    pub is_active: bool,
    pub last_triggered: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Alert {
    type Id = AlertId;

    fn id(&self) -> AlertId {
        self.id
    }
}

impl Alert {
    /// Apply a partial update in place. Validates the merged result.
    pub fn apply(&mut self, patch: AlertPatch) -> DomainResult<()> {
        let mut next = self.clone();
        if let Some(name) = patch.name {
            next.name = name;
        }
        if let Some(query) = patch.query {
            next.query = query;
        }
        if let Some(threshold) = patch.threshold {
            next.threshold = threshold;
        }
        if let Some(is_active) = patch.is_active {
            next.is_active = is_active;
        }
        if let Some(last_triggered) = patch.last_triggered {
            next.last_triggered = Some(last_triggered);
        }
        validate_fields(&next.name, &next.query, next.threshold)?;
        *self = next;
        Ok(())
    }
}

/// Input for creating an alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlert {
    pub name: String,
    pub query: String,
    pub threshold: f64,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl NewAlert {
    pub fn validate(&self) -> DomainResult<()> {
        validate_fields(&self.name, &self.query, self.threshold)
    }

    pub fn into_alert(self, id: AlertId, created_at: DateTime<Utc>) -> DomainResult<Alert> {
        self.validate()?;
        Ok(Alert {
            id,
            name: self.name,
            query: self.query,
            threshold: self.threshold,
            is_active: self.is_active.unwrap_or(true),
            last_triggered: None,
            created_at,
        })
    }
}

/// Partial alert update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub last_triggered: Option<DateTime<Utc>>,
}

fn validate_fields(name: &str, query: &str, threshold: f64) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    if query.trim().is_empty() {
        return Err(DomainError::validation("query cannot be empty"));
    }
    if !threshold.is_finite() {
        return Err(DomainError::validation("threshold must be a finite number"));
    }
    Ok(())
}

//! Dashboard records served by the remote

use crate::mutation::{MutationDraft, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Country a company reports from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    /// ISO 3166 alpha-2 code
    pub code: String,
    pub name: String,
    pub region: String,
}

/// Monthly greenhouse gas emission figure for one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhgEmission {
    /// Month in `YYYY-MM` form
    pub year_month: String,
    pub source: String,
    /// Tonnes of CO2 equivalent
    pub emissions: f64,
}

/// Reporting company with its emission history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    /// Country code
    pub country: String,
    pub emissions: Vec<GhgEmission>,
}

/// Note attached to a company and month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    /// Id of the company the post is about
    pub resource_uid: String,
    /// Month in `YYYY-MM` form
    pub date_time: String,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// Create/update payload for a [`Post`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    /// Existing post id, `None` to create
    pub id: Option<String>,
    pub title: String,
    pub resource_uid: String,
    pub date_time: String,
    pub content: String,
    pub author: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Country {
    fn id(&self) -> &str {
        &self.code
    }
}

impl Record for Company {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Post {
    fn id(&self) -> &str {
        &self.id
    }
}

impl MutationDraft for PostDraft {
    type Record = Post;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn to_optimistic(&self, id: &str, now: DateTime<Utc>) -> Post {
        Post {
            id: id.to_string(),
            title: self.title.clone(),
            resource_uid: self.resource_uid.clone(),
            date_time: self.date_time.clone(),
            content: self.content.clone(),
            author: self.author.clone(),
            created_at: self.created_at.unwrap_or(now),
        }
    }
}

impl Company {
    /// Total emissions across all months and sources
    pub fn total_emissions(&self) -> f64 {
        self.emissions.iter().map(|e| e.emissions).sum()
    }
}

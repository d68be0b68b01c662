//! Curation ledger
//!
//! Append-style record of issue triage metadata (priority, description
//! pointers). Curation never touches funds; it exists so presentation
//! layers can rank and annotate issues.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::RepoId;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CuratedIssue {
    pub repo_id: RepoId,
    pub issue_number: u64,
    pub priority: u64,
    /// Offset of this issue's slice inside the packed descriptions blob.
    pub description_index: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurationEntry {
    pub curation_id: u64,
    pub description: String,
    /// Packed per-issue description blob, sliced via each issue's
    /// `description_index`.
    pub issue_descriptions: String,
    pub issues: Vec<CuratedIssue>,
    pub curated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct CurationLedger {
    entries: Vec<CurationEntry>,
}

impl CurationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one curation record covering a batch of issues. The parallel
    /// arrays are checked pairwise, mirroring the order they arrive in:
    /// priorities against description indices, description indices against
    /// repos, repos against issue numbers.
    #[allow(clippy::too_many_arguments)]
    pub fn curate(
        &mut self,
        priorities: &[u64],
        description_indices: &[usize],
        issue_descriptions: &str,
        description: &str,
        repo_ids: &[RepoId],
        issue_numbers: &[u64],
        curation_id: u64,
    ) -> Result<()> {
        if priorities.len() != description_indices.len() {
            return Err(Error::LengthMismatch);
        }
        if description_indices.len() != repo_ids.len() {
            return Err(Error::LengthMismatch);
        }
        if repo_ids.len() != issue_numbers.len() {
            return Err(Error::LengthMismatch);
        }

        let issues = (0..priorities.len())
            .map(|i| CuratedIssue {
                repo_id: repo_ids[i].clone(),
                issue_number: issue_numbers[i],
                priority: priorities[i],
                description_index: description_indices[i],
            })
            .collect();

        self.entries.push(CurationEntry {
            curation_id,
            description: description.to_string(),
            issue_descriptions: issue_descriptions.to_string(),
            issues,
            curated_at: Utc::now(),
        });
        Ok(())
    }

    pub fn entries(&self) -> &[CurationEntry] {
        &self.entries
    }
}

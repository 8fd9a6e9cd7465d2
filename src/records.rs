//! Typed rows for every stage of the pipeline.

use serde::Deserialize;

/// One row of `regions.csv`. Extra columns (id, slug) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Region {
    pub code: String,
    pub name: String,
}

/// One row of `departments.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct Department {
    pub region_code: String,
    pub code: String,
    pub name: String,
}

/// The five count columns shared by the referendum export and every derived
/// table downstream of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteCounts {
    pub registered: u64,
    pub abstentions: u64,
    pub null_votes: u64,
    pub choice_a: u64,
    pub choice_b: u64,
}

impl VoteCounts {
    pub fn accumulate(&mut self, other: &VoteCounts) {
        self.registered += other.registered;
        self.abstentions += other.abstentions;
        self.null_votes += other.null_votes;
        self.choice_a += other.choice_a;
        self.choice_b += other.choice_b;
    }

    /// Expressed ballots: valid votes only, Null and Abstentions excluded.
    pub fn expressed(&self) -> u64 {
        self.choice_a + self.choice_b
    }

    /// Choice A share of expressed ballots. `None` when nothing was expressed.
    pub fn ratio(&self) -> Option<f64> {
        let expressed = self.expressed();
        if expressed == 0 {
            None
        } else {
            Some(self.choice_a as f64 / expressed as f64)
        }
    }
}

/// One per-town row of `referendum.csv` (semicolon-delimited).
#[derive(Debug, Clone, Deserialize)]
pub struct ReferendumRow {
    #[serde(rename = "Department code")]
    pub department_code: String,
    #[serde(rename = "Department name")]
    pub department_name: String,
    #[serde(rename = "Town code")]
    pub town_code: String,
    #[serde(rename = "Town name")]
    pub town_name: String,
    #[serde(rename = "Registered")]
    pub registered: u64,
    #[serde(rename = "Abstentions")]
    pub abstentions: u64,
    #[serde(rename = "Null")]
    pub null_votes: u64,
    #[serde(rename = "Choice A")]
    pub choice_a: u64,
    #[serde(rename = "Choice B")]
    pub choice_b: u64,
}

impl ReferendumRow {
    pub fn counts(&self) -> VoteCounts {
        VoteCounts {
            registered: self.registered,
            abstentions: self.abstentions,
            null_votes: self.null_votes,
            choice_a: self.choice_a,
            choice_b: self.choice_b,
        }
    }
}

/// One department joined to its region. The department code is stored in
/// normalized form (see [`crate::codes::normalize_department_code`]).
#[derive(Debug, Clone)]
pub struct RegionDepartment {
    pub region_code: String,
    pub region_name: String,
    pub department_code: String,
    pub department_name: String,
}

/// One referendum row carrying its region, department code normalized.
#[derive(Debug, Clone)]
pub struct ReferendumArea {
    pub region_code: String,
    pub region_name: String,
    pub department_code: String,
    pub department_name: String,
    pub town_code: String,
    pub town_name: String,
    pub counts: VoteCounts,
}

/// Summed counts for one region.
#[derive(Debug, Clone)]
pub struct RegionResult {
    pub region_code: String,
    pub region_name: String,
    pub counts: VoteCounts,
}

use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{non_blank, HostelId, UserId};

pub const ISSUE_STATUS_OPEN: &str = "Open";
const HIGH_PRIORITY: &str = "high";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(pub i64);

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueSubmission {
    pub room: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub description: Option<String>,
    pub cost: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Missing required fields")]
pub struct MissingIssueFields;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub hostel_id: HostelId,
    pub room: String,
    pub title: String,
    pub category: Option<String>,
    pub priority: String,
    pub description: Option<String>,
    pub cost: Option<Decimal>,
    pub created_by: UserId,
    pub created_at: NaiveDateTime,
}

impl NewIssue {
    pub fn is_high_priority(&self) -> bool {
        self.priority.eq_ignore_ascii_case(HIGH_PRIORITY)
    }
}

impl IssueSubmission {
    /// Room, title and priority must be present, and the reporter must belong to a hostel.
    pub fn validate(
        self,
        hostel: Option<HostelId>,
        created_by: UserId,
        created_at: NaiveDateTime,
    ) -> Result<NewIssue, MissingIssueFields> {
        let hostel_id = hostel.ok_or(MissingIssueFields)?;
        let room = non_blank(self.room).ok_or(MissingIssueFields)?;
        let title = non_blank(self.title).ok_or(MissingIssueFields)?;
        let priority = non_blank(self.priority).ok_or(MissingIssueFields)?;

        Ok(NewIssue {
            hostel_id,
            room,
            title,
            category: non_blank(self.category),
            priority,
            description: non_blank(self.description),
            cost: self.cost,
            created_by,
            created_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaintenanceIssue {
    pub id: IssueId,
    pub hostel_id: HostelId,
    pub room: String,
    pub title: String,
    pub category: Option<String>,
    pub priority: String,
    pub description: Option<String>,
    pub cost: Option<Decimal>,
    pub status: String,
    pub created_by: Option<UserId>,
    pub created_at: NaiveDateTime,
}

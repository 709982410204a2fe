//! Identifiers and vocabularies shared by every workflow.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary key of `hostel_master`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostelId(pub i64);

impl fmt::Display for HostelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Primary key of `users`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Account role as stored in `users.role_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Owner,
    Staff,
}

impl Role {
    pub const ADMIN_ID: i64 = 1;
    pub const OWNER_ID: i64 = 2;

    pub const fn from_id(id: i64) -> Self {
        match id {
            Self::ADMIN_ID => Self::Admin,
            Self::OWNER_ID => Self::Owner,
            _ => Self::Staff,
        }
    }

    pub const fn id(self) -> Option<i64> {
        match self {
            Self::Admin => Some(Self::ADMIN_ID),
            Self::Owner => Some(Self::OWNER_ID),
            Self::Staff => None,
        }
    }
}

/// Canonical monthly fee status.
///
/// The stored data mixes `Paid` and `Fully Paid`; both parse to [`FeeStatus::Paid`] and
/// queries exclude both spellings through [`FeeStatus::SETTLED_LABELS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeStatus {
    Pending,
    #[serde(rename = "Partially Paid")]
    PartiallyPaid,
    Paid,
    Overdue,
}

impl FeeStatus {
    pub const SETTLED_LABELS: [&'static str; 2] = ["Paid", "Fully Paid"];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "partially paid" | "partial" => Some(Self::PartiallyPaid),
            "paid" | "fully paid" => Some(Self::Paid),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::PartiallyPaid => "Partially Paid",
            Self::Paid => "Paid",
            Self::Overdue => "Overdue",
        }
    }

    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Paid)
    }
}

/// Joins first and last name the way every report and listing shows them.
pub fn full_name(first: &str, last: &str) -> String {
    format!("{} {}", first.trim(), last.trim()).trim().to_string()
}

/// Trims a form value; blank strings count as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{non_blank, HostelId, UserId};

const DEFAULT_GENDER: &str = "Male";

/// Primary key of `student_applications`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub i64);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Primary key of `students`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Pending" => Some(Self::Pending),
            "Approved" => Some(Self::Approved),
            "Rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Public registration form. Every field is optional on the wire and checked by
/// [`ApplicationSubmission::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationSubmission {
    pub hostel_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub permanent_address: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub id_proof_number: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Required fields: hostel_id, first_name, last_name, phone")]
pub struct MissingFields;

/// Validated submission ready to be stored as `Pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub hostel_id: HostelId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub permanent_address: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub id_proof_number: Option<String>,
    pub submitted_at: NaiveDateTime,
}

impl ApplicationSubmission {
    pub fn validate(self, submitted_at: NaiveDateTime) -> Result<NewApplication, MissingFields> {
        let hostel_id = self
            .hostel_id
            .filter(|id| *id > 0)
            .map(HostelId)
            .ok_or(MissingFields)?;
        let first_name = non_blank(self.first_name).ok_or(MissingFields)?;
        let last_name = non_blank(self.last_name).ok_or(MissingFields)?;
        let phone = non_blank(self.phone).ok_or(MissingFields)?;

        Ok(NewApplication {
            hostel_id,
            first_name,
            last_name,
            phone,
            email: non_blank(self.email),
            date_of_birth: self.date_of_birth,
            gender: non_blank(self.gender).unwrap_or_else(|| DEFAULT_GENDER.to_string()),
            permanent_address: non_blank(self.permanent_address),
            guardian_name: non_blank(self.guardian_name),
            guardian_phone: non_blank(self.guardian_phone),
            id_proof_number: non_blank(self.id_proof_number),
            submitted_at,
        })
    }
}

/// Stored application as returned by listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    pub application_id: ApplicationId,
    pub hostel_id: HostelId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub permanent_address: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub id_proof_number: Option<String>,
    pub status: ApplicationStatus,
    pub rejection_reason: Option<String>,
    pub submitted_at: NaiveDateTime,
    pub reviewed_at: Option<NaiveDateTime>,
    pub reviewed_by: Option<UserId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApprovalRequest {
    pub room_id: Option<i64>,
    pub monthly_rent: Option<Decimal>,
    pub admission_fee: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RejectionRequest {
    pub rejection_reason: Option<String>,
}

/// Student fields written on approval in addition to the copied application data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub room_id: Option<i64>,
    pub monthly_rent: Decimal,
    pub admission_fee: Decimal,
    pub admitted_on: NaiveDate,
}

pub const ADMISSION_STATUS_UNPAID: &str = "Unpaid";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Review {
    pub reviewer: UserId,
    pub reviewed_at: NaiveDateTime,
}

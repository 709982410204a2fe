//! Identity of the account behind a request.
//!
//! Tokens are verified by the gateway in front of this service, which forwards the
//! resolved identity in plain headers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::domain::{HostelId, Role, UserId};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const ROLE_ID_HEADER: &str = "x-role-id";
pub const HOSTEL_ID_HEADER: &str = "x-hostel-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub role: Role,
    pub hostel_id: Option<HostelId>,
}

/// Which hostels a caller may read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostelScope {
    All,
    Only(HostelId),
}

impl HostelScope {
    pub fn hostel(self) -> Option<HostelId> {
        match self {
            Self::All => None,
            Self::Only(id) => Some(id),
        }
    }

    pub fn permits(self, hostel: HostelId) -> bool {
        match self {
            Self::All => true,
            Self::Only(id) => id == hostel,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("Access token is required")]
    Unauthenticated,
    #[error("Your account is not linked to any hostel.")]
    NoHostelLinked,
    #[error("{0}")]
    Forbidden(&'static str),
}

impl AccessError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::NoHostelLinked | Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "success": false, "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl Caller {
    pub fn owner(user_id: i64, hostel_id: Option<i64>) -> Self {
        Self {
            user_id: UserId(user_id),
            role: Role::Owner,
            hostel_id: hostel_id.map(HostelId),
        }
    }

    pub fn admin(user_id: i64) -> Self {
        Self {
            user_id: UserId(user_id),
            role: Role::Admin,
            hostel_id: None,
        }
    }

    /// Owners are pinned to their linked hostel; everyone else sees all hostels.
    pub fn scope(&self) -> Result<HostelScope, AccessError> {
        match self.role {
            Role::Owner => self
                .hostel_id
                .map(HostelScope::Only)
                .ok_or(AccessError::NoHostelLinked),
            Role::Admin | Role::Staff => Ok(HostelScope::All),
        }
    }

    /// The hostel this caller operates on, preferring the linked one over a requested one.
    pub fn resolve_hostel(&self, requested: Option<HostelId>) -> Result<Option<HostelId>, AccessError> {
        match self.scope()? {
            HostelScope::Only(id) => Ok(Some(id)),
            HostelScope::All => Ok(requested.or(self.hostel_id)),
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AccessError> {
        let user_id = header_i64(headers, USER_ID_HEADER).ok_or(AccessError::Unauthenticated)?;
        let role_id = header_i64(headers, ROLE_ID_HEADER).ok_or(AccessError::Unauthenticated)?;
        let hostel_id = header_i64(headers, HOSTEL_ID_HEADER).map(HostelId);

        Ok(Self {
            user_id: UserId(user_id),
            role: Role::from_id(role_id),
            hostel_id,
        })
    }
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok())
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AccessError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Caller::from_headers(&parts.headers)
    }
}

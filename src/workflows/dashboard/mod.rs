//! Owner dashboard: this month's fees, bed occupancy and the fees falling due next.

pub mod capacity;
pub mod router;
pub mod service;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::HostelId;
use crate::repository::RepositoryError;

pub use capacity::bed_capacity;
pub use router::dashboard_router;
pub use service::DashboardService;

/// Sums over the fees of one billing period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodFeeTotals {
    /// `monthly_rent + carry_forward`
    pub expected: Decimal,
    pub collected: Decimal,
    pub pending: Decimal,
}

/// A room with its type and current occupancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLoad {
    pub room_id: i64,
    pub room_type_name: Option<String>,
    pub description: Option<String>,
    /// Active students currently assigned, when any.
    pub active_students: Option<u32>,
    /// Stored `occupied_beds` column.
    pub occupied_beds: u32,
}

/// Unpaid fee of an active student, ordered by due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueFee {
    pub fee_id: i64,
    pub student_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub room_number: String,
    pub amount: Decimal,
    pub due_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub days_left: Option<i64>,
}

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// `period` is the `YYYY-MM` fee month.
    async fn period_fee_totals(
        &self,
        hostel: HostelId,
        period: &str,
    ) -> Result<PeriodFeeTotals, RepositoryError>;

    async fn collected_on(&self, hostel: HostelId, day: NaiveDate) -> Result<Decimal, RepositoryError>;

    async fn rooms(&self, hostel: HostelId) -> Result<Vec<RoomLoad>, RepositoryError>;

    /// Unsettled fees of active students, soonest due first. `days_left` is left empty.
    async fn due_soon(&self, hostel: HostelId, limit: u32) -> Result<Vec<DueFee>, RepositoryError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeeStats {
    pub total_expected: Decimal,
    pub total_collected: Decimal,
    pub total_pending: Decimal,
    pub today_collected: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoomStats {
    pub total_rooms: u32,
    pub total_beds: u32,
    pub occupied_beds: u32,
    pub available_beds: u32,
}

impl RoomStats {
    pub fn from_rooms(rooms: &[RoomLoad]) -> Self {
        let mut stats = Self {
            total_rooms: rooms.len() as u32,
            ..Self::default()
        };

        for room in rooms {
            stats.total_beds += bed_capacity(room.room_type_name.as_deref(), room.description.as_deref());
            stats.occupied_beds += room
                .active_students
                .filter(|count| *count > 0)
                .unwrap_or(room.occupied_beds);
        }

        stats.available_beds = stats.total_beds.saturating_sub(stats.occupied_beds);
        stats
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerStats {
    pub fees: FeeStats,
    pub rooms: RoomStats,
    pub due_payments: Vec<DueFee>,
}

use std::sync::Arc;

use chrono::NaiveDate;

use super::{DashboardRepository, FeeStats, OwnerStats, RoomStats};
use crate::domain::HostelId;
use crate::repository::RepositoryError;

const DUE_SOON_LIMIT: u32 = 5;

pub struct DashboardService<R> {
    repository: Arc<R>,
}

impl<R> DashboardService<R>
where
    R: DashboardRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Snapshot of one hostel as of `today`.
    pub async fn owner_stats(
        &self,
        hostel: HostelId,
        today: NaiveDate,
    ) -> Result<OwnerStats, RepositoryError> {
        let period = today.format("%Y-%m").to_string();
        let totals = self.repository.period_fee_totals(hostel, &period).await?;
        let today_collected = self.repository.collected_on(hostel, today).await?;
        let rooms = self.repository.rooms(hostel).await?;

        let mut due_payments = self.repository.due_soon(hostel, DUE_SOON_LIMIT).await?;
        for fee in &mut due_payments {
            fee.days_left = fee.due_date.map(|due| (due - today).num_days());
        }

        Ok(OwnerStats {
            fees: FeeStats {
                total_expected: totals.expected,
                total_collected: totals.collected,
                total_pending: totals.pending,
                today_collected,
            },
            rooms: RoomStats::from_rooms(&rooms),
            due_payments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::dashboard::{DueFee, PeriodFeeTotals, RoomLoad};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FixedDashboard {
        requested_period: Mutex<Option<String>>,
    }

    #[async_trait]
    impl DashboardRepository for FixedDashboard {
        async fn period_fee_totals(
            &self,
            _hostel: HostelId,
            period: &str,
        ) -> Result<PeriodFeeTotals, RepositoryError> {
            *self.requested_period.lock().expect("poisoned") = Some(period.to_string());
            Ok(PeriodFeeTotals {
                expected: Decimal::new(30000, 0),
                collected: Decimal::new(18000, 0),
                pending: Decimal::new(12000, 0),
            })
        }

        async fn collected_on(
            &self,
            _hostel: HostelId,
            _day: NaiveDate,
        ) -> Result<Decimal, RepositoryError> {
            Ok(Decimal::new(250050, 2))
        }

        async fn rooms(&self, _hostel: HostelId) -> Result<Vec<RoomLoad>, RepositoryError> {
            Ok(vec![RoomLoad {
                room_id: 7,
                room_type_name: Some("Double".to_string()),
                description: None,
                active_students: Some(1),
                occupied_beds: 2,
            }])
        }

        async fn due_soon(
            &self,
            _hostel: HostelId,
            limit: u32,
        ) -> Result<Vec<DueFee>, RepositoryError> {
            assert_eq!(limit, 5);
            Ok(vec![DueFee {
                fee_id: 1,
                student_id: 3,
                first_name: "Asha".to_string(),
                last_name: "Rao".to_string(),
                room_number: "N/A".to_string(),
                amount: Decimal::new(6000, 0),
                due_date: NaiveDate::from_ymd_opt(2025, 11, 10),
                phone: None,
                days_left: None,
            }])
        }
    }

    #[tokio::test]
    async fn stats_cover_current_month_and_days_left() {
        let repository = Arc::new(FixedDashboard::default());
        let service = DashboardService::new(repository.clone());
        let today = NaiveDate::from_ymd_opt(2025, 11, 14).expect("valid date");

        let stats = service
            .owner_stats(HostelId(1), today)
            .await
            .expect("stats computed");

        assert_eq!(
            repository.requested_period.lock().expect("poisoned").as_deref(),
            Some("2025-11")
        );
        assert_eq!(stats.fees.today_collected, Decimal::new(250050, 2));
        assert_eq!(stats.rooms.total_beds, 2);
        assert_eq!(stats.rooms.available_beds, 1);
        assert_eq!(stats.due_payments[0].days_left, Some(-4));
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    Display,
    EnumString,
    ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": "E1",
        "date": "2024-01-05",
        "status": "Present",
        "created_at": "2024-01-05T09:00:00Z",
        "updated_at": "2024-01-05T09:00:00Z"
    })
)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: i64,

    /// References `Employee::employee_id`. Existence is checked at write
    /// time; rows survive deletion of the employee.
    #[schema(example = "E1")]
    pub employee_id: String,

    /// Calendar day, time-of-day already truncated. One row per
    /// (employee_id, date).
    #[schema(example = "2024-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "Present")]
    pub status: AttendanceStatus,

    #[schema(
        example = "2024-01-05T09:00:00Z",
        value_type = String,
        format = "date-time"
    )]
    pub created_at: DateTime<Utc>,

    #[schema(
        example = "2024-01-05T09:00:00Z",
        value_type = String,
        format = "date-time"
    )]
    pub updated_at: DateTime<Utc>,
}

/// Derived summary for one employee's record set. Recomputed on every read,
/// never stored, so it cannot drift from the ledger.
#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceStats {
    #[schema(example = 3)]
    pub total_days: i64,
    #[schema(example = 2)]
    pub present_days: i64,
    #[schema(example = 1)]
    pub absent_days: i64,
    /// Two-decimal percentage, "0.00" for an empty record set.
    #[schema(example = "66.67")]
    pub attendance_percentage: String,
}

impl AttendanceStats {
    pub fn compute(records: &[Attendance]) -> Self {
        let total_days = records.len() as i64;
        let present_days = records
            .iter()
            .filter(|r| r.status == AttendanceStatus::Present)
            .count() as i64;
        let absent_days = records
            .iter()
            .filter(|r| r.status == AttendanceStatus::Absent)
            .count() as i64;

        let attendance_percentage = if total_days == 0 {
            "0.00".to_string()
        } else {
            format!("{:.2}", present_days as f64 / total_days as f64 * 100.0)
        };

        Self {
            total_days,
            present_days,
            absent_days,
            attendance_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32, status: AttendanceStatus) -> Attendance {
        let now = Utc::now();
        Attendance {
            id: day as i64,
            employee_id: "E1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn status_parses_exact_variants_only() {
        assert_eq!("Present".parse::<AttendanceStatus>().ok(), Some(AttendanceStatus::Present));
        assert_eq!("Absent".parse::<AttendanceStatus>().ok(), Some(AttendanceStatus::Absent));
        assert!("present".parse::<AttendanceStatus>().is_err());
        assert!("Late".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn stats_for_empty_record_set() {
        let stats = AttendanceStats::compute(&[]);
        assert_eq!(stats.total_days, 0);
        assert_eq!(stats.present_days, 0);
        assert_eq!(stats.absent_days, 0);
        assert_eq!(stats.attendance_percentage, "0.00");
    }

    #[test]
    fn stats_count_both_statuses() {
        let records = vec![
            record(1, AttendanceStatus::Present),
            record(2, AttendanceStatus::Absent),
            record(3, AttendanceStatus::Present),
        ];
        let stats = AttendanceStats::compute(&records);
        assert_eq!(stats.total_days, 3);
        assert_eq!(stats.present_days, 2);
        assert_eq!(stats.absent_days, 1);
        assert_eq!(stats.attendance_percentage, "66.67");
    }

    #[test]
    fn stats_round_to_two_decimals() {
        let records = vec![
            record(1, AttendanceStatus::Present),
            record(2, AttendanceStatus::Absent),
            record(3, AttendanceStatus::Absent),
        ];
        assert_eq!(AttendanceStats::compute(&records).attendance_percentage, "33.33");

        let all_present = vec![record(4, AttendanceStatus::Present)];
        assert_eq!(AttendanceStats::compute(&all_present).attendance_percentage, "100.00");
    }
}

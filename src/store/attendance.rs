//! Ledger table queries. The UNIQUE (employee_id, date) constraint is what
//! ultimately guarantees at most one record per employee per calendar day.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::model::attendance::{Attendance, AttendanceStatus};

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>("SELECT * FROM attendance ORDER BY date DESC, id DESC")
        .fetch_all(pool)
        .await
}

pub async fn list_for_employee(
    pool: &SqlitePool,
    employee_id: &str,
) -> Result<Vec<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(
        "SELECT * FROM attendance WHERE employee_id = ? ORDER BY date DESC, id DESC",
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await
}

/// Inclusive range on the calendar day.
pub async fn list_between(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(
        "SELECT * FROM attendance WHERE date >= ? AND date <= ? ORDER BY date DESC, id DESC",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>("SELECT * FROM attendance WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_for_day(
    pool: &SqlitePool,
    employee_id: &str,
    day: NaiveDate,
) -> Result<Option<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>("SELECT * FROM attendance WHERE employee_id = ? AND date = ?")
        .bind(employee_id)
        .bind(day)
        .fetch_optional(pool)
        .await
}

pub async fn insert(
    pool: &SqlitePool,
    employee_id: &str,
    day: NaiveDate,
    status: AttendanceStatus,
) -> Result<Attendance, sqlx::Error> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, date, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(day)
    .bind(status)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Attendance {
        id: result.last_insert_rowid(),
        employee_id: employee_id.to_string(),
        date: day,
        status,
        created_at: now,
        updated_at: now,
    })
}

/// Status is the only mutable field; date and employee never change here.
pub async fn set_status(
    pool: &SqlitePool,
    record: &Attendance,
    status: AttendanceStatus,
) -> Result<Attendance, sqlx::Error> {
    let now = Utc::now();
    sqlx::query("UPDATE attendance SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(record.id)
        .execute(pool)
        .await?;

    Ok(Attendance {
        status,
        updated_at: now,
        ..record.clone()
    })
}

pub async fn delete_by_id(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM attendance WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::error::is_unique_violation;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[actix_web::test]
    async fn same_day_second_insert_hits_constraint() {
        let pool = test_pool().await;
        insert(&pool, "E1", day(5), AttendanceStatus::Present)
            .await
            .unwrap();

        let err = insert(&pool, "E1", day(5), AttendanceStatus::Absent)
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));

        // A different employee on the same day is fine.
        insert(&pool, "E2", day(5), AttendanceStatus::Absent)
            .await
            .unwrap();
    }

    #[actix_web::test]
    async fn list_orders_by_date_descending() {
        let pool = test_pool().await;
        insert(&pool, "E1", day(4), AttendanceStatus::Present)
            .await
            .unwrap();
        insert(&pool, "E1", day(6), AttendanceStatus::Absent)
            .await
            .unwrap();
        insert(&pool, "E1", day(5), AttendanceStatus::Present)
            .await
            .unwrap();

        let all = list_all(&pool).await.unwrap();
        let days: Vec<NaiveDate> = all.iter().map(|r| r.date).collect();
        assert_eq!(days, vec![day(6), day(5), day(4)]);
    }

    #[actix_web::test]
    async fn range_query_is_inclusive_on_both_bounds() {
        let pool = test_pool().await;
        for d in [3, 4, 5, 6] {
            insert(&pool, "E1", day(d), AttendanceStatus::Present)
                .await
                .unwrap();
        }

        let hits = list_between(&pool, day(4), day(5)).await.unwrap();
        let days: Vec<NaiveDate> = hits.iter().map(|r| r.date).collect();
        assert_eq!(days, vec![day(5), day(4)]);
    }

    #[actix_web::test]
    async fn set_status_keeps_identity_and_date() {
        let pool = test_pool().await;
        let record = insert(&pool, "E1", day(5), AttendanceStatus::Present)
            .await
            .unwrap();

        let updated = set_status(&pool, &record, AttendanceStatus::Absent)
            .await
            .unwrap();
        assert_eq!(updated.id, record.id);
        assert_eq!(updated.date, record.date);
        assert_eq!(updated.status, AttendanceStatus::Absent);

        let fetched = find_by_id(&pool, record.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, AttendanceStatus::Absent);
    }

    #[actix_web::test]
    async fn delete_is_permanent() {
        let pool = test_pool().await;
        let record = insert(&pool, "E1", day(5), AttendanceStatus::Present)
            .await
            .unwrap();

        assert_eq!(delete_by_id(&pool, record.id).await.unwrap(), 1);
        assert!(find_by_id(&pool, record.id).await.unwrap().is_none());
        assert_eq!(delete_by_id(&pool, record.id).await.unwrap(), 0);
    }
}

//! Directory table queries. Uniqueness of `employee_id` and `email` lives in
//! the table's UNIQUE constraints; callers translate constraint rejections.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::model::employee::Employee;

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await
}

pub async fn find_by_employee_id(
    pool: &SqlitePool,
    employee_id: &str,
) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE employee_id = ?")
        .bind(employee_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Uniqueness re-check for an email change, excluding the row being updated.
pub async fn email_taken_by_other(
    pool: &SqlitePool,
    email: &str,
    employee_id: &str,
) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM employees WHERE email = ? AND employee_id <> ?",
    )
    .bind(email)
    .bind(employee_id)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

pub async fn insert(
    pool: &SqlitePool,
    employee_id: &str,
    name: &str,
    email: &str,
    department: &str,
) -> Result<Employee, sqlx::Error> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO employees (employee_id, name, email, department, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(name)
    .bind(email)
    .bind(department)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Employee {
        id: result.last_insert_rowid(),
        employee_id: employee_id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        department: department.to_string(),
        created_at: now,
        updated_at: now,
    })
}

/// `employee_id` is immutable; only the mutable identity fields are written.
pub async fn update(
    pool: &SqlitePool,
    current: &Employee,
    name: &str,
    email: &str,
    department: &str,
) -> Result<Employee, sqlx::Error> {
    let now = Utc::now();
    sqlx::query(
        "UPDATE employees SET name = ?, email = ?, department = ?, updated_at = ? WHERE employee_id = ?",
    )
    .bind(name)
    .bind(email)
    .bind(department)
    .bind(now)
    .bind(&current.employee_id)
    .execute(pool)
    .await?;

    Ok(Employee {
        name: name.to_string(),
        email: email.to_string(),
        department: department.to_string(),
        updated_at: now,
        ..current.clone()
    })
}

pub async fn delete_by_employee_id(
    pool: &SqlitePool,
    employee_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM employees WHERE employee_id = ?")
        .bind(employee_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::error::is_unique_violation;

    #[actix_web::test]
    async fn insert_then_lookup_roundtrip() {
        let pool = test_pool().await;
        let created = insert(&pool, "E1", "Ann", "ann@example.com", "Engineering")
            .await
            .unwrap();

        let fetched = find_by_employee_id(&pool, "E1").await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.name, "Ann");
        assert_eq!(fetched.email, "ann@example.com");
        assert_eq!(fetched.department, "Engineering");
    }

    #[actix_web::test]
    async fn employee_id_constraint_rejects_second_insert() {
        let pool = test_pool().await;
        insert(&pool, "E1", "Ann", "ann@example.com", "Engineering")
            .await
            .unwrap();

        let err = insert(&pool, "E1", "Bob", "bob@example.com", "Ops")
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[actix_web::test]
    async fn email_constraint_rejects_second_insert() {
        let pool = test_pool().await;
        insert(&pool, "E1", "Ann", "ann@example.com", "Engineering")
            .await
            .unwrap();

        let err = insert(&pool, "E2", "Bob", "ann@example.com", "Ops")
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[actix_web::test]
    async fn list_orders_most_recently_created_first() {
        let pool = test_pool().await;
        insert(&pool, "E1", "Ann", "ann@example.com", "Engineering")
            .await
            .unwrap();
        insert(&pool, "E2", "Bob", "bob@example.com", "Ops")
            .await
            .unwrap();

        let all = list_all(&pool).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].employee_id, "E2");
        assert_eq!(all[1].employee_id, "E1");
    }

    #[actix_web::test]
    async fn email_taken_by_other_excludes_own_row() {
        let pool = test_pool().await;
        insert(&pool, "E1", "Ann", "ann@example.com", "Engineering")
            .await
            .unwrap();
        insert(&pool, "E2", "Bob", "bob@example.com", "Ops")
            .await
            .unwrap();

        assert!(!email_taken_by_other(&pool, "ann@example.com", "E1").await.unwrap());
        assert!(email_taken_by_other(&pool, "ann@example.com", "E2").await.unwrap());
        assert!(!email_taken_by_other(&pool, "new@example.com", "E2").await.unwrap());
    }

    #[actix_web::test]
    async fn update_rewrites_mutable_fields_only() {
        let pool = test_pool().await;
        let created = insert(&pool, "E1", "Ann", "ann@example.com", "Engineering")
            .await
            .unwrap();

        let updated = update(&pool, &created, "Ann C.", "ann.c@example.com", "Platform")
            .await
            .unwrap();
        assert_eq!(updated.employee_id, "E1");
        assert_eq!(updated.created_at, created.created_at);

        let fetched = find_by_employee_id(&pool, "E1").await.unwrap().unwrap();
        assert_eq!(fetched.name, "Ann C.");
        assert_eq!(fetched.email, "ann.c@example.com");
        assert_eq!(fetched.department, "Platform");
    }

    #[actix_web::test]
    async fn delete_removes_the_row() {
        let pool = test_pool().await;
        insert(&pool, "E1", "Ann", "ann@example.com", "Engineering")
            .await
            .unwrap();

        assert_eq!(delete_by_employee_id(&pool, "E1").await.unwrap(), 1);
        assert!(find_by_employee_id(&pool, "E1").await.unwrap().is_none());
        assert_eq!(delete_by_employee_id(&pool, "E1").await.unwrap(), 0);
    }
}

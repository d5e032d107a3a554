use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": "E1",
        "name": "Ann Chowdhury",
        "email": "ann@example.com",
        "department": "Engineering",
        "created_at": "2024-01-01T09:00:00Z",
        "updated_at": "2024-01-01T09:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: i64,

    /// Business identifier, unique and immutable after creation. Attendance
    /// records reference this, not the surrogate `id`.
    #[schema(example = "E1")]
    pub employee_id: String,

    #[schema(example = "Ann Chowdhury")]
    pub name: String,

    /// Stored lowercased; uniqueness is case-insensitive.
    #[schema(example = "ann@example.com")]
    pub email: String,

    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(
        example = "2024-01-01T09:00:00Z",
        value_type = String,
        format = "date-time"
    )]
    pub created_at: DateTime<Utc>,

    #[schema(
        example = "2024-01-01T09:00:00Z",
        value_type = String,
        format = "date-time"
    )]
    pub updated_at: DateTime<Utc>,
}

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{error, info};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, is_unique_violation};
use crate::model::attendance::{AttendanceStats, AttendanceStatus};
use crate::store;
use crate::validate;

const ALREADY_MARKED: &str = "Attendance already marked for this date. Please update instead.";

#[derive(Deserialize, ToSchema)]
pub struct MarkAttendance {
    #[schema(example = "E1", value_type = String)]
    pub employee_id: Option<String>,
    /// Date or datetime; any time-of-day is truncated to the calendar day.
    #[schema(example = "2024-01-05", value_type = String)]
    pub date: Option<String>,
    #[schema(example = "Present", value_type = String)]
    pub status: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateAttendance {
    #[schema(example = "Absent", value_type = String)]
    pub status: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct DateRangeQuery {
    /// Inclusive lower bound, date or datetime.
    #[schema(example = "2024-01-01", value_type = String)]
    pub start_date: Option<String>,
    /// Inclusive upper bound, date or datetime.
    #[schema(example = "2024-01-31", value_type = String)]
    pub end_date: Option<String>,
}

/// List attendance records
#[utoipa::path(
    get,
    path = "/attendance",
    responses(
        (status = 200, description = "All records, most recent date first", body = Object, example = json!({
            "success": true,
            "count": 1,
            "data": [{
                "id": 1,
                "employee_id": "E1",
                "date": "2024-01-05",
                "status": "Present",
                "created_at": "2024-01-05T09:00:00Z",
                "updated_at": "2024-01-05T09:00:00Z"
            }]
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let records = store::attendance::list_all(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": records.len(),
        "data": records,
    })))
}

/// Attendance and statistics for one employee
#[utoipa::path(
    get,
    path = "/attendance/employee/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Business employee identifier")
    ),
    responses(
        (status = 200, description = "Records plus statistics recomputed from the current record set", body = Object, example = json!({
            "success": true,
            "employee": {
                "employee_id": "E1",
                "name": "Ann Chowdhury",
                "email": "ann@example.com",
                "department": "Engineering"
            },
            "statistics": {
                "total_days": 1,
                "present_days": 1,
                "absent_days": 0,
                "attendance_percentage": "100.00"
            },
            "data": []
        })),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn employee_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    let Some(employee) =
        store::employees::find_by_employee_id(pool.get_ref(), &employee_id).await?
    else {
        return Err(ApiError::NotFound("Employee not found".to_string()));
    };

    let records = store::attendance::list_for_employee(pool.get_ref(), &employee_id).await?;
    let statistics = AttendanceStats::compute(&records);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "employee": {
            "employee_id": employee.employee_id,
            "name": employee.name,
            "email": employee.email,
            "department": employee.department,
        },
        "statistics": statistics,
        "data": records,
    })))
}

/// Attendance within a date range
#[utoipa::path(
    get,
    path = "/attendance/date-range",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Records with date in [start_date, end_date], inclusive", body = Object, example = json!({
            "success": true,
            "count": 0,
            "data": []
        })),
        (status = 400, description = "Missing or unparseable bound"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn attendance_by_date_range(
    pool: web::Data<SqlitePool>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, ApiError> {
    let mut errors = Vec::new();
    let start = validate::require(query.start_date.as_deref(), "start_date", &mut errors);
    let end = validate::require(query.end_date.as_deref(), "end_date", &mut errors);

    let start = start.and_then(|raw| {
        validate::parse_day(raw).or_else(|| {
            errors.push("start_date must be a valid date".to_string());
            None
        })
    });
    let end = end.and_then(|raw| {
        validate::parse_day(raw).or_else(|| {
            errors.push("end_date must be a valid date".to_string());
            None
        })
    });

    let (Some(start), Some(end)) = (start, end) else {
        return Err(ApiError::Validation(errors.join(", ")));
    };

    // No employee-existence check here: the range query is global.
    let records = store::attendance::list_between(pool.get_ref(), start, end).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": records.len(),
        "data": records,
    })))
}

/// Mark attendance
#[utoipa::path(
    post,
    path = "/attendance",
    request_body = MarkAttendance,
    responses(
        (status = 201, description = "Attendance recorded", body = Object, example = json!({
            "success": true,
            "message": "Attendance marked successfully"
        })),
        (status = 400, description = "Missing/invalid fields, or already marked for this calendar day"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    pool: web::Data<SqlitePool>,
    payload: web::Json<MarkAttendance>,
) -> Result<HttpResponse, ApiError> {
    let mut errors = Vec::new();
    let employee_id = validate::require(payload.employee_id.as_deref(), "employee_id", &mut errors);
    let date = validate::require(payload.date.as_deref(), "date", &mut errors);
    let status = validate::require(payload.status.as_deref(), "status", &mut errors);

    let day = date.and_then(|raw| {
        validate::parse_day(raw).or_else(|| {
            errors.push("date must be a valid date or datetime".to_string());
            None
        })
    });
    let status = status.and_then(|raw| {
        raw.parse::<AttendanceStatus>().ok().or_else(|| {
            errors.push(r#"Status must be either "Present" or "Absent""#.to_string());
            None
        })
    });

    let (Some(employee_id), Some(day), Some(status)) = (employee_id, day, status) else {
        return Err(ApiError::Validation(errors.join(", ")));
    };

    if store::employees::find_by_employee_id(pool.get_ref(), employee_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Employee not found".to_string()));
    }

    if store::attendance::find_for_day(pool.get_ref(), employee_id, day)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(ALREADY_MARKED.to_string()));
    }

    match store::attendance::insert(pool.get_ref(), employee_id, day, status).await {
        Ok(record) => {
            info!(employee_id, date = %day, status = %status, "attendance marked");
            Ok(HttpResponse::Created().json(json!({
                "success": true,
                "message": "Attendance marked successfully",
                "data": record,
            })))
        }
        // Lost the race against a concurrent mark for the same day.
        Err(e) if is_unique_violation(&e) => Err(ApiError::Conflict(ALREADY_MARKED.to_string())),
        Err(e) => {
            error!(error = %e, "failed to mark attendance");
            Err(ApiError::Internal)
        }
    }
}

/// Update attendance status
#[utoipa::path(
    put,
    path = "/attendance/{id}",
    params(
        ("id" = i64, Path, description = "Attendance record id")
    ),
    request_body = UpdateAttendance,
    responses(
        (status = 200, description = "Status updated", body = Object, example = json!({
            "success": true,
            "message": "Attendance updated successfully"
        })),
        (status = 400, description = "Missing or invalid status"),
        (status = 404, description = "Attendance record not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn update_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<UpdateAttendance>,
) -> Result<HttpResponse, ApiError> {
    let record_id = path.into_inner();

    let mut errors = Vec::new();
    let status = validate::require(payload.status.as_deref(), "status", &mut errors).and_then(
        |raw| {
            raw.parse::<AttendanceStatus>().ok().or_else(|| {
                errors.push(r#"Status must be either "Present" or "Absent""#.to_string());
                None
            })
        },
    );
    let Some(status) = status else {
        return Err(ApiError::Validation(errors.join(", ")));
    };

    let Some(record) = store::attendance::find_by_id(pool.get_ref(), record_id).await? else {
        return Err(ApiError::NotFound("Attendance record not found".to_string()));
    };

    let updated = store::attendance::set_status(pool.get_ref(), &record, status).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Attendance updated successfully",
        "data": updated,
    })))
}

/// Delete attendance record
#[utoipa::path(
    delete,
    path = "/attendance/{id}",
    params(
        ("id" = i64, Path, description = "Attendance record id")
    ),
    responses(
        (status = 200, description = "Record deleted", body = Object, example = json!({
            "success": true,
            "message": "Attendance record deleted successfully",
            "data": {}
        })),
        (status = 404, description = "Attendance record not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let record_id = path.into_inner();

    if store::attendance::find_by_id(pool.get_ref(), record_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Attendance record not found".to_string()));
    }

    store::attendance::delete_by_id(pool.get_ref(), record_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Attendance record deleted successfully",
        "data": {},
    })))
}

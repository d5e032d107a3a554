use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::error::{ApiError, is_unique_violation, unique_violation_detail};
use crate::store;
use crate::validate;

/// Fields arrive as options so missing values surface as the crate's own
/// validation envelope rather than a deserialization failure.
#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "E1", value_type = String)]
    pub employee_id: Option<String>,
    #[schema(example = "Ann Chowdhury", value_type = String)]
    pub name: Option<String>,
    #[schema(example = "ann@example.com", format = "email", value_type = String)]
    pub email: Option<String>,
    #[schema(example = "Engineering", value_type = String)]
    pub department: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployee {
    #[schema(example = "Ann Chowdhury", value_type = String)]
    pub name: Option<String>,
    #[schema(example = "ann@example.com", format = "email", value_type = String)]
    pub email: Option<String>,
    #[schema(example = "Platform", value_type = String)]
    pub department: Option<String>,
}

/// List employees
#[utoipa::path(
    get,
    path = "/employees",
    responses(
        (status = 200, description = "All employees, most recently created first", body = Object, example = json!({
            "success": true,
            "count": 1,
            "data": [{
                "id": 1,
                "employee_id": "E1",
                "name": "Ann Chowdhury",
                "email": "ann@example.com",
                "department": "Engineering",
                "created_at": "2024-01-01T09:00:00Z",
                "updated_at": "2024-01-01T09:00:00Z"
            }]
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn list_employees(pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let employees = store::employees::list_all(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": employees.len(),
        "data": employees,
    })))
}

/// Get one employee
#[utoipa::path(
    get,
    path = "/employees/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Business employee identifier")
    ),
    responses(
        (status = 200, description = "Employee found", body = Object, example = json!({
            "success": true,
            "data": {
                "id": 1,
                "employee_id": "E1",
                "name": "Ann Chowdhury",
                "email": "ann@example.com",
                "department": "Engineering"
            }
        })),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    match store::employees::find_by_employee_id(pool.get_ref(), &employee_id).await? {
        Some(employee) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": employee,
        }))),
        None => Err(ApiError::NotFound("Employee not found".to_string())),
    }
}

/// Create employee
#[utoipa::path(
    post,
    path = "/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Object, example = json!({
            "success": true,
            "message": "Employee created successfully"
        })),
        (status = 400, description = "Missing/malformed fields or duplicate employee_id/email"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, ApiError> {
    let mut errors = Vec::new();
    let employee_id = validate::require(payload.employee_id.as_deref(), "employee_id", &mut errors);
    let name = validate::require(payload.name.as_deref(), "name", &mut errors);
    let email = validate::require(payload.email.as_deref(), "email", &mut errors);
    let department = validate::require(payload.department.as_deref(), "department", &mut errors);

    if let Some(email) = email {
        if !validate::is_valid_email(email) {
            errors.push("Please provide a valid email address".to_string());
        }
    }

    let (Some(employee_id), Some(name), Some(email), Some(department)) =
        (employee_id, name, email, department)
    else {
        return Err(ApiError::Validation(errors.join(", ")));
    };
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors.join(", ")));
    }

    let email = email.to_lowercase();

    // Pre-check both uniqueness rules, employee_id first. The UNIQUE
    // constraints still back this up under concurrent creates.
    if store::employees::find_by_employee_id(pool.get_ref(), employee_id)
        .await?
        .is_some()
    {
        return Err(ApiError::Duplicate("Employee ID already exists".to_string()));
    }
    if store::employees::find_by_email(pool.get_ref(), &email)
        .await?
        .is_some()
    {
        return Err(ApiError::Duplicate("Email address already exists".to_string()));
    }

    match store::employees::insert(pool.get_ref(), employee_id, name, &email, department).await {
        Ok(employee) => {
            info!(employee_id = %employee.employee_id, "employee created");
            Ok(HttpResponse::Created().json(json!({
                "success": true,
                "message": "Employee created successfully",
                "data": employee,
            })))
        }
        Err(e) if is_unique_violation(&e) => {
            let detail = unique_violation_detail(&e).unwrap_or_default();
            if detail.contains("employees.employee_id") {
                Err(ApiError::Duplicate("Employee ID already exists".to_string()))
            } else {
                Err(ApiError::Duplicate("Email address already exists".to_string()))
            }
        }
        Err(e) => {
            error!(error = %e, "failed to create employee");
            Err(ApiError::Internal)
        }
    }
}

/// Update employee
#[utoipa::path(
    put,
    path = "/employees/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Business employee identifier")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = Object, example = json!({
            "success": true,
            "message": "Employee updated successfully"
        })),
        (status = 400, description = "Empty field, malformed email, or email already in use"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
    payload: web::Json<UpdateEmployee>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    let Some(current) =
        store::employees::find_by_employee_id(pool.get_ref(), &employee_id).await?
    else {
        return Err(ApiError::NotFound("Employee not found".to_string()));
    };

    let mut errors = Vec::new();
    let name = validate::optional(payload.name.as_deref(), "name", &mut errors);
    let email = validate::optional(payload.email.as_deref(), "email", &mut errors);
    let department = validate::optional(payload.department.as_deref(), "department", &mut errors);

    if let Some(email) = email {
        if !validate::is_valid_email(email) {
            errors.push("Please provide a valid email address".to_string());
        }
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors.join(", ")));
    }

    let email = email.map(|e| e.to_lowercase());
    if let Some(new_email) = email.as_deref() {
        if new_email != current.email
            && store::employees::email_taken_by_other(pool.get_ref(), new_email, &employee_id)
                .await?
        {
            return Err(ApiError::Duplicate("Email address already exists".to_string()));
        }
    }

    let name = name.unwrap_or(current.name.as_str());
    let email = email.as_deref().unwrap_or(current.email.as_str());
    let department = department.unwrap_or(current.department.as_str());

    match store::employees::update(pool.get_ref(), &current, name, email, department).await {
        Ok(employee) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Employee updated successfully",
            "data": employee,
        }))),
        Err(e) if is_unique_violation(&e) => {
            Err(ApiError::Duplicate("Email address already exists".to_string()))
        }
        Err(e) => {
            error!(error = %e, %employee_id, "failed to update employee");
            Err(ApiError::Internal)
        }
    }
}

/// Delete employee
#[utoipa::path(
    delete,
    path = "/employees/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Business employee identifier")
    ),
    responses(
        (status = 200, description = "Employee deleted; response carries the removed snapshot", body = Object, example = json!({
            "success": true,
            "message": "Employee deleted successfully"
        })),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    let Some(employee) =
        store::employees::find_by_employee_id(pool.get_ref(), &employee_id).await?
    else {
        return Err(ApiError::NotFound("Employee not found".to_string()));
    };

    // Attendance rows are intentionally left in place; the ledger keeps the
    // orphaned employee_id reference.
    store::employees::delete_by_employee_id(pool.get_ref(), &employee_id).await?;
    info!(%employee_id, "employee deleted");

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Employee deleted successfully",
        "data": employee,
    })))
}

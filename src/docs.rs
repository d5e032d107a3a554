use crate::api::attendance::{DateRangeQuery, MarkAttendance, UpdateAttendance};
use crate::api::employee::{CreateEmployee, UpdateEmployee};
use crate::model::attendance::{Attendance, AttendanceStats, AttendanceStatus};
use crate::model::employee::Employee;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Tracker API",
        version = "1.0.0",
        description = r#"
## Employee Attendance Tracker

Tracks one Present/Absent entry per employee per calendar day and derives
attendance statistics on demand.

### 🔹 Key Features
- **Employee Directory**
  - Create, update, list, view and delete employee records
  - Unique employee identifiers and case-insensitive unique emails
- **Attendance Ledger**
  - One record per employee per calendar day, timestamps truncated to the day
  - Date-range queries and per-employee history
- **Statistics**
  - Present/absent counts and attendance percentage, recomputed on every read

### 📦 Response Format
Every response is a JSON envelope: `{"success": bool, "data"?, "error"?,
"count"?, "message"?}`.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::create_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::list_attendance,
        crate::api::attendance::employee_attendance,
        crate::api::attendance::attendance_by_date_range,
        crate::api::attendance::mark_attendance,
        crate::api::attendance::update_attendance,
        crate::api::attendance::delete_attendance,
    ),
    components(
        schemas(
            Employee,
            CreateEmployee,
            UpdateEmployee,
            Attendance,
            AttendanceStatus,
            AttendanceStats,
            MarkAttendance,
            UpdateAttendance,
            DateRangeQuery,
        )
    ),
    tags(
        (name = "Employee", description = "Employee directory APIs"),
        (name = "Attendance", description = "Attendance ledger APIs"),
    )
)]
pub struct ApiDoc;

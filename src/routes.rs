use crate::api::{attendance, employee};
use crate::config::Config;
use crate::error::ApiError;
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build the per-IP limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let api_limiter = build_limiter(config.rate_api_per_min);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(api_limiter)
            .configure(register),
    );
}

/// Route tree without the operational middleware; the endpoint tests mount
/// this directly.
pub fn register(cfg: &mut web::ServiceConfig) {
    // Extractor failures (bad JSON, non-numeric path ids, undecodable query
    // strings) surface as the same validation envelope as field errors.
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| ApiError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _| ApiError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| ApiError::Validation(err.to_string()).into()),
    )
    .service(
        web::scope("/employees")
            // /employees
            .service(
                web::resource("")
                    .route(web::get().to(employee::list_employees))
                    .route(web::post().to(employee::create_employee)),
            )
            // /employees/{employee_id}
            .service(
                web::resource("/{employee_id}")
                    .route(web::get().to(employee::get_employee))
                    .route(web::put().to(employee::update_employee))
                    .route(web::delete().to(employee::delete_employee)),
            ),
    )
    .service(
        web::scope("/attendance")
            // /attendance
            .service(
                web::resource("")
                    .route(web::get().to(attendance::list_attendance))
                    .route(web::post().to(attendance::mark_attendance)),
            )
            // /attendance/date-range
            .service(
                web::resource("/date-range")
                    .route(web::get().to(attendance::attendance_by_date_range)),
            )
            // /attendance/employee/{employee_id}
            .service(
                web::resource("/employee/{employee_id}")
                    .route(web::get().to(attendance::employee_attendance)),
            )
            // /attendance/{id}
            .service(
                web::resource("/{id}")
                    .route(web::put().to(attendance::update_attendance))
                    .route(web::delete().to(attendance::delete_attendance)),
            ),
    );
}

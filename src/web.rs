use actix_files::Files;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{error, info};

use crate::catalog::{self, Doctor};
use crate::error::BookingError;
use crate::ledger::{Appointment, AppointmentLedger};
use crate::schedule::{project_week, DayAvailability};
use crate::store::JsonStore;

/// Bundled demo catalog, used when no upstream URL is configured.
const DEFAULT_CATALOG_PATH: &str = "data/doctors.csv";

// In-memory state shared by all workers. The catalog is replaced wholesale
// on every refresh/upload; the ledger is the single owner of bookings.
pub struct AppState {
    pub doctors: Mutex<Vec<Doctor>>,
    pub catalog_error: Mutex<Option<String>>,
    pub ledger: Mutex<AppointmentLedger>,
    pub catalog_url: Option<String>,
}

#[derive(Deserialize)]
pub struct BookRequest {
    doctor_name: String,
    date: String,
    day_of_week: String,
    start_time: String,
    end_time: String,
}

#[derive(Serialize)]
pub struct ScheduleResponse {
    doctor: String,
    timezone: String,
    days: Vec<DayAvailability>,
}

// Doctor catalog endpoint
async fn get_doctors(state: web::Data<AppState>) -> Result<HttpResponse> {
    let catalog_error = state.catalog_error.lock().unwrap();
    if let Some(ref message) = *catalog_error {
        return Ok(HttpResponse::BadGateway()
            .json(serde_json::json!({"success": false, "error": message})));
    }

    let doctors = state.doctors.lock().unwrap();
    Ok(HttpResponse::Ok().json(&*doctors))
}

// 7-day schedule projection for one doctor, starting today
async fn get_schedule(
    doctor_name: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let doctors = state.doctors.lock().unwrap();
    let Some(doctor) = catalog::find_doctor(&doctors, &doctor_name) else {
        return Ok(HttpResponse::NotFound()
            .json(serde_json::json!({"error": format!("Unknown doctor: {}", doctor_name)})));
    };

    let ledger = state.ledger.lock().unwrap();
    let today = Local::now().date_naive();
    match project_week(doctor, ledger.appointments(), today) {
        Ok(days) => Ok(HttpResponse::Ok().json(ScheduleResponse {
            doctor: doctor.name.clone(),
            timezone: doctor.timezone.clone(),
            days,
        })),
        Err(e) => Ok(HttpResponse::InternalServerError()
            .json(serde_json::json!({"error": e.to_string()}))),
    }
}

// Booking endpoint
async fn book_appointment(
    req: web::Json<BookRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let doctors = state.doctors.lock().unwrap();
    let Some(doctor) = catalog::find_doctor(&doctors, &req.doctor_name) else {
        return Ok(HttpResponse::NotFound()
            .json(serde_json::json!({"success": false, "error": format!("Unknown doctor: {}", req.doctor_name)})));
    };

    let appointment = Appointment::new(
        doctor,
        &req.date,
        &req.day_of_week,
        &req.start_time,
        &req.end_time,
    );

    let mut ledger = state.ledger.lock().unwrap();
    match ledger.book(appointment.clone()) {
        Ok(()) => Ok(HttpResponse::Ok()
            .json(serde_json::json!({"success": true, "appointment": appointment}))),
        Err(e) => Ok(HttpResponse::Conflict()
            .json(serde_json::json!({"success": false, "error": e.to_string()}))),
    }
}

// Cancellation endpoint
async fn cancel_appointment(
    id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut ledger = state.ledger.lock().unwrap();
    match ledger.cancel(&id) {
        Ok(removed) => Ok(HttpResponse::Ok()
            .json(serde_json::json!({"success": true, "appointment": removed}))),
        Err(e @ BookingError::NotFound(_)) => Ok(HttpResponse::NotFound()
            .json(serde_json::json!({"success": false, "error": e.to_string()}))),
        Err(e) => Ok(HttpResponse::InternalServerError()
            .json(serde_json::json!({"success": false, "error": e.to_string()}))),
    }
}

// Upcoming/past views
async fn get_appointments(state: web::Data<AppState>) -> Result<HttpResponse> {
    let ledger = state.ledger.lock().unwrap();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "upcoming": ledger.upcoming(),
        "past": ledger.past(),
    })))
}

// Re-fetch the catalog from the configured upstream. A failed fetch leaves
// an error message and an empty catalog, never a partial one. Two racing
// refreshes resolve last-writer-wins.
async fn refresh_catalog(state: web::Data<AppState>) -> Result<HttpResponse> {
    let Some(ref url) = state.catalog_url else {
        return Ok(HttpResponse::BadRequest()
            .json(serde_json::json!({"success": false, "error": "No catalog URL configured"})));
    };

    match catalog::fetch_doctors(url).await {
        Ok(records) => {
            let doctors = catalog::group_doctors(&records);
            info!("refreshed catalog: {} doctors", doctors.len());
            let count = doctors.len();
            *state.doctors.lock().unwrap() = doctors;
            *state.catalog_error.lock().unwrap() = None;
            Ok(HttpResponse::Ok()
                .json(serde_json::json!({"success": true, "doctors": count})))
        }
        Err(e) => {
            error!("catalog refresh failed: {}", e);
            *state.doctors.lock().unwrap() = Vec::new();
            *state.catalog_error.lock().unwrap() = Some(e.to_string());
            Ok(HttpResponse::BadGateway()
                .json(serde_json::json!({"success": false, "error": e.to_string()})))
        }
    }
}

// CSV catalog upload, replacing the in-memory catalog wholesale
async fn upload_catalog(body: web::Bytes, state: web::Data<AppState>) -> Result<HttpResponse> {
    let records = catalog::parse_doctors_csv(&body);
    if records.is_empty() {
        return Ok(HttpResponse::BadRequest()
            .json(serde_json::json!({"success": false, "error": "No usable rows in uploaded CSV"})));
    }

    let doctors = catalog::group_doctors(&records);
    let count = doctors.len();
    *state.doctors.lock().unwrap() = doctors;
    *state.catalog_error.lock().unwrap() = None;

    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "doctors": count})))
}

// HTML page handler
async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

async fn initial_catalog(url: Option<&str>) -> (Vec<Doctor>, Option<String>) {
    match url {
        Some(url) => match catalog::fetch_doctors(url).await {
            Ok(records) => (catalog::group_doctors(&records), None),
            Err(e) => {
                error!("initial catalog fetch failed: {}", e);
                (Vec::new(), Some(e.to_string()))
            }
        },
        None => match catalog::load_doctors_csv(DEFAULT_CATALOG_PATH) {
            Ok(records) => (catalog::group_doctors(&records), None),
            Err(e) => {
                error!("could not load bundled catalog: {}", e);
                (Vec::new(), Some(format!("Error fetching doctors: {}", e)))
            }
        },
    }
}

pub async fn start_server(
    port: u16,
    catalog_url: Option<String>,
    store: JsonStore,
) -> std::io::Result<()> {
    let (doctors, catalog_error) = initial_catalog(catalog_url.as_deref()).await;

    let app_state = web::Data::new(AppState {
        doctors: Mutex::new(doctors),
        catalog_error: Mutex::new(catalog_error),
        ledger: Mutex::new(AppointmentLedger::load(store)),
        catalog_url,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", "static"))
            .route("/", web::get().to(index))
            .route("/api/doctors", web::get().to(get_doctors))
            .route("/api/appointments", web::get().to(get_appointments))
            .route("/api/book", web::post().to(book_appointment))
            .route("/api/refresh", web::post().to(refresh_catalog))
            .route("/api/upload", web::post().to(upload_catalog))
            .service(web::resource("/api/schedule/{doctor}").route(web::get().to(get_schedule)))
            .service(web::resource("/api/cancel/{id}").route(web::post().to(cancel_appointment)))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

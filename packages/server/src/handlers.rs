//! HTTP handler functions for the incident map API.

use actix_web::{HttpResponse, web};
use incident_map_incident_models::IncidentRecord;
use incident_map_ingest::DEFAULT_DATA_URL;
use incident_map_jobs_models::{AnalysisRequest, DateRange, JobStatus};
use incident_map_server_models::{ApiHealth, ImportSummary, PendingResult, SubmitJobRequest};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/data`
///
/// Imports incident records. A JSON array body upserts those records
/// directly; an empty body triggers a download of the upstream CSV
/// export (`INCIDENT_DATA_URL`, defaulting to the public portal).
pub async fn import_data(state: web::Data<AppState>, body: web::Bytes) -> HttpResponse {
    let records = if body.is_empty() {
        let url =
            std::env::var("INCIDENT_DATA_URL").unwrap_or_else(|_| DEFAULT_DATA_URL.to_string());
        match incident_map_ingest::fetch_csv(&url).await {
            Ok(records) => records,
            Err(e) => {
                log::error!("Failed to import upstream dataset: {e}");
                return HttpResponse::BadGateway().json(serde_json::json!({
                    "error": "Failed to import upstream dataset"
                }));
            }
        }
    } else {
        match serde_json::from_slice::<Vec<IncidentRecord>>(&body) {
            Ok(records) => records,
            Err(e) => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": format!("Invalid record payload: {e}")
                }));
            }
        }
    };

    let imported = incident_map_ingest::import_records(&state.records, records);
    HttpResponse::Ok().json(ImportSummary {
        imported,
        total: state.records.len(),
    })
}

/// `GET /api/data`
pub async fn list_data(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.records.all())
}

/// `DELETE /api/data`
pub async fn delete_data(state: web::Data<AppState>) -> HttpResponse {
    state.records.clear();
    HttpResponse::Ok().json(serde_json::json!({ "deleted": true }))
}

/// `GET /api/data/ids`
pub async fn list_ids(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.records.ids())
}

/// `GET /api/data/ids/{id}`
pub async fn get_record(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    state.records.get(&id).map_or_else(
        || {
            HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Unknown incident ID: {id}")
            }))
        },
        |record| HttpResponse::Ok().json(record),
    )
}

/// `POST /api/jobs`
///
/// Creates an analysis job and queues it for the worker pool. Malformed
/// dates are rejected here; the pipeline never sees an unparsed range.
pub async fn submit_job(
    state: web::Data<AppState>,
    body: web::Json<SubmitJobRequest>,
) -> HttpResponse {
    let range = match DateRange::parse(&body.start_date, &body.end_date) {
        Ok(range) => range,
        Err(e) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string()
            }));
        }
    };

    let request = AnalysisRequest {
        map: body.want_map,
        chart: body.want_chart,
        report: body.want_report,
    };

    let descriptor = state.jobs.create(range, request);
    state.queue.enqueue(descriptor.id.clone());
    HttpResponse::Created().json(descriptor)
}

/// `GET /api/jobs`
pub async fn list_jobs(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.jobs.list())
}

/// `GET /api/jobs/{id}`
pub async fn get_job(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    match state.jobs.get(&path.into_inner()) {
        Ok(descriptor) => HttpResponse::Ok().json(descriptor),
        Err(e) => HttpResponse::NotFound().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// `GET /api/results/{id}`
///
/// Reports "still processing" until the job completes; afterwards the
/// stored result, degraded or not, is returned as a payload.
pub async fn get_result(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let job_id = path.into_inner();

    let job = match state.jobs.get(&job_id) {
        Ok(job) => job,
        Err(e) => {
            return HttpResponse::NotFound().json(serde_json::json!({ "error": e.to_string() }));
        }
    };

    if job.status != JobStatus::Complete {
        return HttpResponse::Ok().json(PendingResult {
            status: job.status,
            message: "Your analysis is still being processed".to_string(),
        });
    }

    // Workers post the result before flipping status to complete, so a
    // complete job always has one.
    match state.results.get(&job_id) {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(_) => HttpResponse::Ok().json(PendingResult {
            status: job.status,
            message: "Result not yet available".to_string(),
        }),
    }
}

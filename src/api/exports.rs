//! Booking export endpoint.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::AdminAccess;
use crate::errors::{AppError, AppErrorWithRevision};
use crate::export::{bookings_csv, bookings_report_html, ExportFormat};
use crate::models::{BrandingData, Registration};
use crate::AppState;

/// Export query parameters.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// `csv` (default) or `pdf`.
    pub format: Option<String>,
}

/// GET /api/export - Download all bookings as CSV or a printable report.
pub async fn export_bookings(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Query(params): Query<ExportQuery>,
) -> Result<Response, AppErrorWithRevision> {
    let revision_id = state
        .repo
        .revision::<Vec<Registration>>()
        .await
        .unwrap_or(0);
    let fail = |error: AppError| AppErrorWithRevision { error, revision_id };

    let format = params.format.as_deref().unwrap_or("csv");
    let format = ExportFormat::parse(format).ok_or_else(|| {
        fail(AppError::BadRequest(
            "Invalid format. Use ?format=csv or ?format=pdf".to_string(),
        ))
    })?;

    let registrations = state
        .repo
        .load::<Vec<Registration>>()
        .await
        .map_err(fail)?
        .value;

    let now = Utc::now();
    let body = match format {
        ExportFormat::Csv => bookings_csv(&registrations),
        ExportFormat::Pdf => {
            let branding = state.repo.load::<BrandingData>().await.map_err(fail)?.value;
            bookings_report_html(&registrations, &branding.event_title, now)
        }
    };

    tracing::info!(
        format = ?format,
        bookings = registrations.len(),
        "Bookings exported"
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", format.file_name(now)),
            ),
        ],
        body,
    )
        .into_response())
}

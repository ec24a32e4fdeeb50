//! Registration API endpoints.

use axum::extract::{Path, Query, State};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::{error, success, ApiJson, ApiResult};
use crate::auth::AdminAccess;
use crate::errors::AppError;
use crate::models::{
    batch_reference, delegate_references, generate_booking_reference, is_known_ticket_type,
    BrandingData, CreateRegistrationRequest, DelegateInput, Registration, RegistrationReceipt,
    RegistrationStatus, UpdateRegistrationStatusRequest,
};
use crate::notify;
use crate::AppState;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Filters for listing registrations.
#[derive(Debug, Deserialize)]
pub struct RegistrationQuery {
    /// Booking reference, with or without the `-N` delegate suffix.
    pub reference: Option<String>,
    pub status: Option<String>,
}

/// Validate every delegate, naming the first field that fails.
fn validate_delegates(delegates: &[DelegateInput], batch: bool) -> Result<(), AppError> {
    if delegates.is_empty() {
        return Err(AppError::Validation(
            "delegates must contain at least one delegate".to_string(),
        ));
    }

    for (index, delegate) in delegates.iter().enumerate() {
        let prefix = if batch {
            format!("delegates[{}].", index)
        } else {
            String::new()
        };

        let required = [
            ("firstName", &delegate.first_name),
            ("lastName", &delegate.last_name),
            ("email", &delegate.email),
            ("ticketType", &delegate.ticket_type),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(AppError::Validation(format!(
                "{}{} is required",
                prefix, field
            )));
        }

        let email = delegate.email.trim();
        if !EMAIL_PATTERN.is_match(email) {
            return Err(AppError::Validation(format!(
                "{}email is not a valid email address: {}",
                prefix, email
            )));
        }

        let ticket_type = delegate.ticket_type.trim();
        if !is_known_ticket_type(ticket_type) {
            return Err(AppError::Validation(format!(
                "{}ticketType is not a known ticket type: {}",
                prefix, ticket_type
            )));
        }
    }

    Ok(())
}

/// POST /api/registrations - Book one or more delegates.
pub async fn create_registration(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateRegistrationRequest>,
) -> ApiResult<RegistrationReceipt> {
    let revision_id = state
        .repo
        .revision::<Vec<Registration>>()
        .await
        .unwrap_or(0);

    let batch = request.is_batch();
    let (delegates, billing) = request.into_parts();
    if let Err(e) = validate_delegates(&delegates, batch) {
        return error(e, revision_id);
    }

    let now = Utc::now();
    let result = state
        .repo
        .mutate(|registrations: &mut Vec<Registration>| {
            let reference = generate_booking_reference(registrations, now.timestamp_millis());
            let created_at = now.to_rfc3339();
            let created: Vec<Registration> = delegate_references(&reference, delegates.len())
                .into_iter()
                .zip(&delegates)
                .map(|(booking_reference, delegate)| {
                    Registration::from_delegate(
                        delegate,
                        &billing,
                        booking_reference,
                        created_at.clone(),
                    )
                })
                .collect();
            registrations.extend(created.iter().cloned());

            Ok(RegistrationReceipt {
                reference,
                registrations: created,
            })
        })
        .await;

    match result {
        Ok((receipt, revision)) => {
            tracing::info!(
                reference = %receipt.reference,
                delegates = receipt.registrations.len(),
                "Registration received"
            );

            let branding = match state.repo.load::<BrandingData>().await {
                Ok(loaded) => loaded.value,
                Err(e) => {
                    tracing::warn!("Failed to load branding for notifications: {}", e);
                    BrandingData::default()
                }
            };
            notify::registrations_created(&receipt.registrations, &branding);

            success(receipt, revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/registrations - List registrations.
pub async fn list_registrations(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Query(params): Query<RegistrationQuery>,
) -> ApiResult<Vec<Registration>> {
    let revision_id = state
        .repo
        .revision::<Vec<Registration>>()
        .await
        .unwrap_or(0);

    let status = match params.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match RegistrationStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                return error(
                    AppError::Validation(format!("Unknown status: {}", raw)),
                    revision_id,
                )
            }
        },
    };
    let reference = params
        .reference
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    match state.repo.load::<Vec<Registration>>().await {
        Ok(loaded) => {
            let registrations = loaded
                .value
                .into_iter()
                .filter(|r| status.map_or(true, |s| r.status == s))
                .filter(|r| {
                    reference.map_or(true, |wanted| {
                        r.booking_reference.eq_ignore_ascii_case(wanted)
                            || batch_reference(&r.booking_reference).eq_ignore_ascii_case(wanted)
                    })
                })
                .collect();
            success(registrations, loaded.revision)
        }
        Err(e) => error(e, revision_id),
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Registration {} not found", id))
}

/// GET /api/registrations/:id - Get a single registration.
pub async fn get_registration(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Registration> {
    let revision_id = state
        .repo
        .revision::<Vec<Registration>>()
        .await
        .unwrap_or(0);

    match state.repo.load::<Vec<Registration>>().await {
        Ok(loaded) => match loaded.value.into_iter().find(|r| r.id == id) {
            Some(registration) => success(registration, loaded.revision),
            None => error(not_found(&id), loaded.revision),
        },
        Err(e) => error(e, revision_id),
    }
}

/// PATCH /api/registrations/:id - Change a registration's status.
pub async fn update_registration_status(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateRegistrationStatusRequest>,
) -> ApiResult<Registration> {
    let revision_id = state
        .repo
        .revision::<Vec<Registration>>()
        .await
        .unwrap_or(0);

    let Some(status) = RegistrationStatus::parse(request.status.trim()) else {
        let allowed: Vec<&str> = RegistrationStatus::ALL.iter().map(|s| s.as_str()).collect();
        return error(
            AppError::Validation(format!(
                "status must be one of {}; got {:?}",
                allowed.join(", "),
                request.status
            )),
            revision_id,
        );
    };

    let result = state
        .repo
        .mutate(|registrations: &mut Vec<Registration>| {
            let registration = registrations
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| not_found(&id))?;
            registration.status = status;
            Ok(registration.clone())
        })
        .await;

    match result {
        Ok((registration, revision)) => {
            tracing::info!(id = %registration.id, status = status.as_str(), "Registration status changed");
            success(registration, revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/registrations/:id - Remove a registration.
pub async fn delete_registration(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let revision_id = state
        .repo
        .revision::<Vec<Registration>>()
        .await
        .unwrap_or(0);

    let result = state
        .repo
        .mutate(|registrations: &mut Vec<Registration>| {
            let before = registrations.len();
            registrations.retain(|r| r.id != id);
            if registrations.len() == before {
                return Err(not_found(&id));
            }
            Ok(())
        })
        .await;

    match result {
        Ok(((), revision)) => success((), revision),
        Err(e) => error(e, revision_id),
    }
}

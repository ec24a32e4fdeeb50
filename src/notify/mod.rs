//! Booking notifications.
//!
//! No mail is sent; the admin notification and the delegate autoresponder
//! are emitted as structured log events for an external relay to pick up.

use crate::models::{BrandingData, Registration};

pub const ADMIN_ADDRESS: &str = "admin@conference.com";

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

/// Plain-text body of the confirmation sent to a delegate.
pub fn autoresponder_body(registration: &Registration, branding: &BrandingData) -> String {
    format!(
        "Thank you for registering for {title}!\n\
         \n\
         Registration Details:\n\
         - Booking Reference: {reference}\n\
         - Name: {name}\n\
         - Email: {email}\n\
         - Company: {company}\n\
         - Job Title: {job_title}\n\
         - Ticket Type: {ticket}\n\
         - Dietary Requirements: {dietary}\n\
         - Special Requests: {requests}\n\
         \n\
         Event Details:\n\
         - Date: {date}\n\
         - Location: {location}\n\
         \n\
         Status: {status}\n\
         \n\
         We will send you a confirmation email once your registration is reviewed and confirmed.\n\
         \n\
         Best regards,\n\
         {title} Team\n",
        title = branding.event_title,
        reference = registration.display_reference(),
        name = registration.full_name(),
        email = registration.email,
        company = or_placeholder(&registration.company, "N/A"),
        job_title = or_placeholder(&registration.job_title, "N/A"),
        ticket = registration.ticket_type,
        dietary = or_placeholder(&registration.dietary_requirements, "None"),
        requests = or_placeholder(&registration.special_requests, "None"),
        date = branding.event_date,
        location = branding.event_location,
        status = registration.status.as_str(),
    )
}

/// Emit both notifications for every newly stored registration.
pub fn registrations_created(registrations: &[Registration], branding: &BrandingData) {
    for registration in registrations {
        tracing::info!(
            target: "notify",
            to = ADMIN_ADDRESS,
            subject = "New Registration Received",
            reference = %registration.booking_reference,
            registration_id = %registration.id,
            ticket_type = %registration.ticket_type,
            "Admin notification"
        );

        tracing::info!(
            target: "notify",
            to = %registration.email,
            subject = %format!("Registration Confirmation - {}", branding.event_title),
            reference = %registration.booking_reference,
            body = %autoresponder_body(registration, branding),
            "Autoresponder"
        );
    }
}

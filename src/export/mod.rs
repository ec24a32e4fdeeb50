//! Booking exports: a CSV sheet and a printable HTML report.

use chrono::{DateTime, Utc};

use crate::models::{Registration, RegistrationStatus};

const CSV_HEADERS: [&str; 16] = [
    "Booking Reference",
    "First Name",
    "Last Name",
    "Email",
    "Company",
    "Job Title",
    "Ticket Type",
    "Price",
    "Dietary Requirements",
    "Special Requests",
    "Billing Name",
    "Billing Email",
    "Billing Phone",
    "Billing Address",
    "Status",
    "Created Date",
];

/// Export file format requested via `?format=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    /// Print-oriented HTML, saved to PDF from the browser.
    Pdf,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "csv" => Some(ExportFormat::Csv),
            "pdf" => Some(ExportFormat::Pdf),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Pdf => "text/html; charset=utf-8",
        }
    }

    /// `bookings-YYYY-MM-DD.csv` / `.html`
    pub fn file_name(&self, today: DateTime<Utc>) -> String {
        let extension = match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "html",
        };
        format!("bookings-{}.{}", today.format("%Y-%m-%d"), extension)
    }
}

/// Quote a CSV cell, doubling embedded quotes.
fn csv_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// `createdAt` as dd/mm/yyyy, or the raw value when unparseable.
fn display_date(created_at: &str) -> String {
    DateTime::parse_from_rfc3339(created_at)
        .map(|t| t.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|_| created_at.to_string())
}

pub fn bookings_csv(registrations: &[Registration]) -> String {
    let mut lines = Vec::with_capacity(registrations.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for r in registrations {
        let price = r.price().to_string();
        let created = display_date(&r.created_at);
        let cells: [&str; 16] = [
            r.display_reference(),
            &r.first_name,
            &r.last_name,
            &r.email,
            &r.company,
            &r.job_title,
            &r.ticket_type,
            &price,
            &r.dietary_requirements,
            &r.special_requests,
            &r.billing_name,
            &r.billing_email,
            &r.billing_phone,
            &r.billing_address,
            r.status.as_str(),
            &created,
        ];
        lines.push(
            cells
                .iter()
                .map(|cell| csv_cell(cell))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    lines.join("\n")
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        escape_html(value)
    }
}

/// Revenue in whole pounds, counting confirmed bookings only.
pub fn confirmed_revenue(registrations: &[Registration]) -> u32 {
    registrations
        .iter()
        .filter(|r| r.status == RegistrationStatus::Confirmed)
        .map(Registration::price)
        .sum()
}

const REPORT_STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; }
h1 { color: #e23f2c; text-align: center; }
table { border-collapse: collapse; width: 100%; margin-top: 20px; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
th { background-color: #f2f2f2; font-weight: bold; }
.status-pending { background-color: #fff3cd; }
.status-confirmed { background-color: #d4edda; }
.status-cancelled { background-color: #f8d7da; }
.summary { margin-top: 30px; padding: 20px; background-color: #f8f9fa; border-radius: 5px; }
.billing-section { margin-top: 20px; padding: 15px; background-color: #e9ecef; border-radius: 5px; }
@media print { body { margin: 10px; } .no-print { display: none; } }";

/// Printable booking report.
pub fn bookings_report_html(
    registrations: &[Registration],
    event_title: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let mut bookings = String::new();
    let mut billing = String::new();
    for r in registrations {
        bookings.push_str(&format!(
            "<tr class=\"status-{status}\"><td>{name}</td><td>{email}</td><td>{company}</td>\
             <td>{ticket}</td><td>&pound;{price}</td><td>{status}</td><td>{date}</td></tr>\n",
            status = r.status.as_str(),
            name = escape_html(&r.full_name()),
            email = escape_html(&r.email),
            company = or_dash(&r.company),
            ticket = escape_html(&r.ticket_type.replace('_', " ")),
            price = r.price(),
            date = escape_html(&display_date(&r.created_at)),
        ));
        billing.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(r.display_reference()),
            or_dash(&r.billing_name),
            or_dash(&r.billing_email),
            or_dash(&r.billing_phone),
            or_dash(&r.billing_address),
        ));
    }

    let count = |status: RegistrationStatus| {
        registrations.iter().filter(|r| r.status == status).count()
    };

    format!(
        "<!DOCTYPE html>
<html>
<head>
<meta charset=\"utf-8\">
<title>Booking Report</title>
<style>
{style}
</style>
</head>
<body>
<h1>Booking Report - {title}</h1>
<p style=\"text-align: center; margin-bottom: 30px;\">Generated on: {generated}</p>
<table>
<thead><tr><th>Name</th><th>Email</th><th>Company</th><th>Ticket Type</th><th>Price</th><th>Status</th><th>Date</th></tr></thead>
<tbody>
{bookings}</tbody>
</table>
<div class=\"billing-section\">
<h3>Billing Information Summary</h3>
<table style=\"margin-top: 15px;\">
<thead><tr><th>Booking Reference</th><th>Billing Name</th><th>Billing Email</th><th>Billing Phone</th><th>Billing Address</th></tr></thead>
<tbody>
{billing}</tbody>
</table>
</div>
<div class=\"summary\">
<h3>Summary</h3>
<p><strong>Total Bookings:</strong> {total}</p>
<p><strong>Confirmed:</strong> {confirmed}</p>
<p><strong>Pending:</strong> {pending}</p>
<p><strong>Cancelled:</strong> {cancelled}</p>
<p><strong>Total Revenue:</strong> &pound;{revenue}</p>
</div>
<div class=\"no-print\" style=\"margin-top: 30px; text-align: center; color: #666;\">
<p>This is a printable booking report. Use your browser's print function to save as PDF.</p>
</div>
</body>
</html>
",
        style = REPORT_STYLE,
        title = escape_html(event_title),
        generated = generated_at.format("%d/%m/%Y at %H:%M UTC"),
        bookings = bookings,
        billing = billing,
        total = registrations.len(),
        confirmed = count(RegistrationStatus::Confirmed),
        pending = count(RegistrationStatus::Pending),
        cancelled = count(RegistrationStatus::Cancelled),
        revenue = confirmed_revenue(registrations),
    )
}

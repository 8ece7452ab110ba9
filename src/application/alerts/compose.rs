//! Message bodies for document alerts and generated contracts.

use crate::config::CompanyConfig;
use crate::domain::alerts::{AlertItem, AlertState};
use crate::domain::clock::format_civil_date;
use crate::domain::contracts::Contract;
use crate::domain::drivers::Driver;
use crate::domain::notifications::{EmailAttachment, OutboundEmail};

const PDF_CONTENT_TYPE: &str = "application/pdf";
const NO_PLATE: &str = "no plate";

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn footer(company: &CompanyConfig) -> String {
    let contact = company
        .contact_email
        .as_deref()
        .map(|email| format!(" &middot; {}", escape_html(email)))
        .unwrap_or_default();
    format!(
        r#"<hr style="border: none; border-top: 1px solid #ddd; margin: 20px 0;">
<p style="color: #666; font-size: 12px;">{}{}</p>"#,
        escape_html(&company.name),
        contact
    )
}

fn status_text(item: &AlertItem) -> String {
    match item.state {
        AlertState::Expired if item.days_offset == -1 => "Expired yesterday".to_string(),
        AlertState::Expired => format!("Expired {} days ago", -item.days_offset),
        AlertState::DueToday => "Expires today".to_string(),
        AlertState::Upcoming if item.days_offset == 1 => "Expires tomorrow".to_string(),
        AlertState::Upcoming => format!("Expires in {} days", item.days_offset),
    }
}

fn row_colors(item: &AlertItem) -> (&'static str, &'static str) {
    match item.state {
        AlertState::Expired | AlertState::DueToday => ("#dc2626", "#fef2f2"),
        AlertState::Upcoming if item.days_offset <= 10 => ("#ea580c", "#fff7ed"),
        AlertState::Upcoming => ("#f59e0b", "#fffbeb"),
    }
}

/// Subject line, keyed on the most severe state present.
pub fn alert_subject(items: &[AlertItem], plate: &str) -> String {
    match items.iter().map(|i| i.state).min() {
        Some(AlertState::Expired) => format!("[URGENT] Expired documents - {}", plate),
        Some(AlertState::DueToday) => format!("[TODAY] Documents expire today - {}", plate),
        _ => format!("[NOTICE] Documents expiring soon - {}", plate),
    }
}

/// Alert e-mail for one driver; `None` when there is nothing to send or nowhere to send it.
pub fn alert_email(
    driver: &Driver,
    items: &[AlertItem],
    company: &CompanyConfig,
) -> Option<OutboundEmail> {
    let to = driver.email()?;
    if items.is_empty() {
        return None;
    }

    let plate = driver.plate().unwrap_or(NO_PLATE);
    let worst = items.iter().map(|i| i.state).min();
    let (color, heading, intro) = match worst {
        Some(AlertState::Expired) => (
            "#dc2626",
            "Expired documents",
            "has <strong>expired</strong> documents. Contract generation is <strong>blocked</strong> until they are renewed.",
        ),
        Some(AlertState::DueToday) => (
            "#dc2626",
            "Documents expire today",
            "has documents that <strong>expire today</strong>. Renew them now to avoid being blocked.",
        ),
        _ => (
            "#f59e0b",
            "Documents expiring soon",
            "has documents <strong>close to expiry</strong>. Please renew them in time.",
        ),
    };

    let mut ordered: Vec<&AlertItem> = items.iter().collect();
    ordered.sort_by_key(|i| i.state);

    let rows: String = ordered
        .into_iter()
        .map(|item| {
            let (text_color, background) = row_colors(item);
            format!(
                r#"<tr style="background: {bg};"><td style="padding: 12px; border: 1px solid #ddd; font-weight: bold;">{label}</td><td style="padding: 12px; border: 1px solid #ddd;">{date}</td><td style="padding: 12px; border: 1px solid #ddd; color: {fg}; font-weight: bold;">{status}</td></tr>"#,
                bg = background,
                fg = text_color,
                label = escape_html(item.document.label()),
                date = format_civil_date(item.expires_on),
                status = status_text(item),
            )
        })
        .collect();

    let html_body = format!(
        r#"<html><body style="font-family: Arial, sans-serif; color: #333; max-width: 600px; margin: 0 auto;">
<div style="background: {color}; color: white; padding: 25px; text-align: center;">
<h1 style="margin: 0; font-size: 24px;">{heading}</h1>
<p style="margin: 10px 0 0 0; font-size: 14px;">Vehicle: {plate}</p>
</div>
<div style="padding: 20px;">
<p>Hello {name},</p>
<p>Your vehicle {plate} {intro}</p>
<table style="border-collapse: collapse; width: 100%;">
<tr><th style="padding: 12px; border: 1px solid #ddd; text-align: left;">Document</th><th style="padding: 12px; border: 1px solid #ddd; text-align: left;">Expires</th><th style="padding: 12px; border: 1px solid #ddd; text-align: left;">Status</th></tr>
{rows}
</table>
{footer}
</div>
</body></html>"#,
        color = color,
        heading = heading,
        plate = escape_html(plate),
        name = escape_html(driver.full_name()),
        intro = intro,
        rows = rows,
        footer = footer(company),
    );

    Some(OutboundEmail {
        to: to.to_string(),
        subject: alert_subject(items, &escape_html(plate)),
        html_body,
        attachments: Vec::new(),
    })
}

fn contract_summary(contract: &Contract, driver: &Driver) -> String {
    let service = match contract.service.hours() {
        Some((start, end)) => format!("By hour, {} to {}", start, end),
        None => contract
            .service
            .service_date()
            .map(|d| format!("By day, {}", format_civil_date(d)))
            .unwrap_or_default(),
    };
    format!(
        r#"<ul>
<li><strong>Contract:</strong> {number}</li>
<li><strong>Driver:</strong> {name}</li>
<li><strong>Vehicle:</strong> {plate}</li>
<li><strong>City:</strong> {city}</li>
<li><strong>Service:</strong> {service}</li>
</ul>"#,
        number = escape_html(&contract.contract_number),
        name = escape_html(driver.full_name()),
        plate = escape_html(driver.plate().unwrap_or(NO_PLATE)),
        city = escape_html(&contract.city),
        service = service,
    )
}

/// Copies of a freshly generated contract: one for the driver, one for the administrator.
pub fn contract_emails(
    contract: &Contract,
    driver: &Driver,
    pdf: &[u8],
    company: &CompanyConfig,
) -> Vec<OutboundEmail> {
    let mut emails = Vec::new();
    let summary = contract_summary(contract, driver);

    if let Some(to) = driver.email() {
        emails.push(OutboundEmail {
            to: to.to_string(),
            subject: format!("Lease contract - {}", contract.contract_number),
            html_body: format!(
                "<html><body style=\"font-family: Arial, sans-serif; color: #333;\">\
                 <p>Hello {},</p><p>Your contract was generated and is attached.</p>{}{}</body></html>",
                escape_html(driver.full_name()),
                summary,
                footer(company)
            ),
            attachments: vec![EmailAttachment {
                filename: format!("Contrato_{}.pdf", contract.contract_number),
                content_type: PDF_CONTENT_TYPE.to_string(),
                bytes: pdf.to_vec(),
            }],
        });
    }

    if let Some(admin) = company.admin_email.as_deref().filter(|e| !e.trim().is_empty()) {
        emails.push(OutboundEmail {
            to: admin.trim().to_string(),
            subject: format!("New contract generated - {}", contract.contract_number),
            html_body: format!(
                "<html><body style=\"font-family: Arial, sans-serif; color: #333;\">\
                 <p>A new contract was generated.</p>{}{}</body></html>",
                summary,
                footer(company)
            ),
            attachments: vec![EmailAttachment {
                filename: format!("{}.pdf", contract.contract_number),
                content_type: PDF_CONTENT_TYPE.to_string(),
                bytes: pdf.to_vec(),
            }],
        });
    }

    emails
}

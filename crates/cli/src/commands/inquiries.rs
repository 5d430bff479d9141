//! Inquiry commands.

use tracing::info;

use seva_sangam_core::{InquiryStatus, StatusFilter};

use super::{CliError, Connection};

/// Log inquiries matching `status` (`all` or a status name), newest first.
///
/// # Errors
///
/// Returns an error for an unknown status, missing credentials or a
/// failed backend call.
pub async fn list(conn: &Connection, status: &str) -> Result<(), CliError> {
    let filter: StatusFilter<InquiryStatus> = status.parse()?;
    let mut inquiries = conn.backend().get_all_inquiries(conn.admin()?).await?;
    inquiries.retain(|i| filter.matches(i.status));
    inquiries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    info!("{} inquiries", inquiries.len());
    for i in &inquiries {
        info!(
            "  {:<38} {:<36} {:<9} {} {}",
            i.id,
            i.worker_id,
            i.status,
            i.created_at.format("%Y-%m-%d %H:%M"),
            i.inquiry_text.chars().take(60).collect::<String>()
        );
    }
    Ok(())
}

//! Per-URL task processing.
//!
//! This module contains the logic for processing a single URL: wait for a
//! permit, fetch, fingerprint, record.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::Semaphore;

use crate::error_handling::{update_error_stats, ErrorType};
use crate::fetch::fetch_url;

use super::resources::ScanContext;

/// Parameters for processing a single URL task.
pub struct UrlTaskParams {
    /// The URL to process, exactly as listed
    pub url: Arc<str>,
    /// Shared scan state
    pub ctx: Arc<ScanContext>,
    /// Concurrency semaphore
    pub semaphore: Arc<Semaphore>,
}

/// Process a single URL task.
///
/// This function is spawned as a Tokio task for each URL. The permit is
/// held until the function returns, whichever way it returns, so at most
/// `concurrency` URLs are past this point at once. Failures are logged and
/// counted; the URL gets no entry in the results.
pub async fn process_url_task(params: UrlTaskParams) {
    let UrlTaskParams { url, ctx, semaphore } = params;

    let _permit = match semaphore.acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => {
            warn!("Semaphore closed, skipping URL: {url}");
            ctx.error_stats.increment_error(ErrorType::SemaphoreClosed);
            ctx.record_failure();
            return;
        }
    };

    info!("Processing {url}");

    let response = match fetch_url(&ctx.client, &url).await {
        Ok(response) => response,
        Err(e) => {
            warn!("{e}");
            update_error_stats(&ctx.error_stats, &e);
            ctx.record_failure();
            return;
        }
    };

    let technologies = ctx
        .fingerprinter
        .fingerprint(&response.headers, &response.body);
    debug!(
        "{url} ({} from {}) -> {} technolog{}: {:?}",
        response.status,
        response.final_url,
        technologies.len(),
        if technologies.len() == 1 { "y" } else { "ies" },
        technologies
    );

    ctx.record_success(&url, technologies).await;
}

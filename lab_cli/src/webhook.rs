//! Webhook delivery for submitted forms.
//!
//! One POST per submission with the JSON document as the body. The response
//! body is ignored; only transport success or failure is reported back.
//! No retries.

use std::time::Duration;

use lab_core::config::WebhookConfig;
use lab_core::submission::{SubmissionDocument, SubmissionOutcome};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::{info, warn};

/// Current application version (from Cargo.toml)
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upper bound on one delivery attempt
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Post a submission document to the configured webhook.
pub async fn post_submission(config: &WebhookConfig, document: &SubmissionDocument) -> SubmissionOutcome {
    let body = match document.to_json() {
        Ok(b) => b,
        Err(e) => return failed(format!("Failed to serialize form: {}", e)),
    };

    let client = match reqwest::Client::builder()
        .user_agent(format!("Breaksheet/{}", CURRENT_VERSION))
        .timeout(REQUEST_TIMEOUT)
        .build()
    {
        Ok(c) => c,
        Err(e) => return failed(format!("Failed to create HTTP client: {}", e)),
    };

    info!(url = config.url(), submission_id = %document.submission_id, "posting submission");

    let response = match client
        .post(config.url())
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => return failed(format!("Network error: {}", e)),
    };

    let outcome = outcome_for_status(response.status());
    if let SubmissionOutcome::Failed { reason } = &outcome {
        warn!(%reason, "webhook rejected submission");
    }
    outcome
}

/// Map the webhook's HTTP status to the user-facing outcome.
fn outcome_for_status(status: StatusCode) -> SubmissionOutcome {
    if status.is_success() {
        SubmissionOutcome::Succeeded
    } else {
        SubmissionOutcome::Failed {
            reason: format!("Webhook returned {}", status),
        }
    }
}

fn failed(reason: String) -> SubmissionOutcome {
    warn!(%reason, "submission failed");
    SubmissionOutcome::Failed { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_core::form::FormMetadata;
    use lab_core::session::FormSession;
    use lab_core::submission::assemble_now;

    #[test]
    fn test_status_mapping() {
        assert_eq!(outcome_for_status(StatusCode::OK), SubmissionOutcome::Succeeded);
        assert_eq!(outcome_for_status(StatusCode::ACCEPTED), SubmissionOutcome::Succeeded);

        let outcome = outcome_for_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            outcome,
            SubmissionOutcome::Failed {
                reason: "Webhook returned 500 Internal Server Error".to_string()
            }
        );
        assert!(!outcome_for_status(StatusCode::NOT_FOUND).is_success());
    }

    #[tokio::test]
    async fn test_unreachable_webhook_fails() {
        let session = FormSession::with_metadata(FormMetadata::new("Acme", "Tower", "2024-01-30"));
        let document = assemble_now(&session).unwrap();
        let config = WebhookConfig::new("http://127.0.0.1:1/hook").unwrap();

        let outcome = post_submission(&config, &document).await;
        assert!(!outcome.is_success());
        assert!(outcome.user_message().starts_with("Submission failed: Network error"));
    }
}

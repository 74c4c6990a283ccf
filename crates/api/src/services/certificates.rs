use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tally_core::error::CoreError;

/// A member entitled to a certificate.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateRecipient {
    pub name: String,
    pub email: Option<String>,
    pub gender: String,
}

/// Payload for a certificate batch request.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateBatch {
    pub event_name: String,
    pub announced_name: String,
    pub date: String,
    pub official: bool,
    pub members: Vec<CertificateRecipient>,
}

/// Client for the external certificate-rendering service.
///
/// Behind a trait so integration tests can substitute a recording stub
/// instead of performing real HTTP calls.
#[async_trait]
pub trait CertificateService: Send + Sync {
    /// Submit a certificate batch. Returns the upstream job identifier.
    async fn request_certificates(&self, batch: CertificateBatch) -> Result<String, CoreError>;
}

/// HTTP implementation that POSTs to `{base_url}/certificates`.
pub struct HttpCertificateService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCertificateService {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl CertificateService for HttpCertificateService {
    async fn request_certificates(&self, batch: CertificateBatch) -> Result<String, CoreError> {
        let url = format!("{}/certificates", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .json(&batch)
            .send()
            .await
            .map_err(|err| {
                CoreError::Upstream(format!("certificate service unreachable: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::Upstream(format!(
                "certificate service returned {status}: {body}"
            )));
        }

        let body: Value = response.json().await.map_err(|err| {
            CoreError::Upstream(format!("certificate service sent invalid JSON: {err}"))
        })?;

        let job_id = body
            .get("data")
            .and_then(|data| data.get("job_id"))
            .or_else(|| body.get("job_id"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                CoreError::Upstream("certificate service response is missing job_id".to_string())
            })?;

        tracing::info!(job_id = %job_id, event_name = %batch.event_name, "Certificate batch submitted");
        Ok(job_id.to_string())
    }
}

/// Render the certificate date line. Single-day events show one date,
/// multi-day events show a range.
pub fn certificate_date_text(start: NaiveDate, end: NaiveDate) -> String {
    if start == end {
        start.format("%Y-%m-%d").to_string()
    } else {
        format!("{} - {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
    }
}

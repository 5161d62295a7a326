//! HTTP mail-relay transport.
//!
//! Messages go out as a JSON POST to a relay endpoint that performs
//! the actual SMTP hop. The relay contract is a flat document:
//!
//! ```json
//! {
//!   "from": "contracts@example.test",
//!   "from_name": "Contracts System",
//!   "to": "partner@acme.test",
//!   "cc": "ops@example.test",
//!   "subject": "New Contract Assignment",
//!   "html": "<p>...</p>"
//! }
//! ```

use serde::Serialize;

use super::{MailMessage, MailTransport, TransportError};

/// Sends mail through an HTTP relay endpoint.
#[derive(Debug, Clone)]
pub struct HttpRelayTransport {
    client: reqwest::Client,
    endpoint: String,
    from_email: String,
    from_name: String,
    api_token: Option<String>,
}

#[derive(Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    from_name: &'a str,
    to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cc: Option<&'a str>,
    subject: &'a str,
    html: &'a str,
}

impl HttpRelayTransport {
    pub fn new(
        endpoint: impl Into<String>,
        from_email: impl Into<String>,
        from_name: impl Into<String>,
        api_token: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            from_email: from_email.into(),
            from_name: from_name.into(),
            api_token,
        }
    }
}

#[async_trait::async_trait]
impl MailTransport for HttpRelayTransport {
    async fn send(&self, message: &MailMessage) -> Result<(), TransportError> {
        let payload = RelayPayload {
            from: &self.from_email,
            from_name: &self.from_name,
            to: &message.to,
            cc: message.cc.as_deref(),
            subject: &message.subject,
            html: &message.html_body,
        };

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(to = %message.to, subject = %message.subject, "email sent");
        Ok(())
    }
}

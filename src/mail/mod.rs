//! Outbound mail: the transport seam and the contract notifier.
//!
//! Delivery failures are an operational concern, never an API-level
//! one: a [`TransportError`] is logged by the caller and the primary
//! operation proceeds.

pub mod notify;
pub mod relay;

pub use notify::{ContractEvent, Notifier};
pub use relay::HttpRelayTransport;

use async_trait::async_trait;
use thiserror::Error;

/// A composed message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    /// Optional CC address, typically a shared operations mailbox.
    pub cc: Option<String>,
    pub subject: String,
    pub html_body: String,
}

/// Errors from the mail transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The relay was unreachable or the request could not be built.
    #[error("Mail relay request failed: {0}")]
    Request(String),

    /// The relay answered with a non-success status.
    #[error("Mail relay rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// The delivery seam. The real implementation hands the message to an
/// HTTP mail relay; tests substitute a recorder.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), TransportError>;
}

/// Transport used when no relay is configured: drops every message
/// after logging it, so the service stays usable in development.
#[derive(Debug, Default)]
pub struct NullTransport;

#[async_trait]
impl MailTransport for NullTransport {
    async fn send(&self, message: &MailMessage) -> Result<(), TransportError> {
        tracing::debug!(
            to = %message.to,
            subject = %message.subject,
            "mail relay not configured; dropping message"
        );
        Ok(())
    }
}

//! Contract event notifications.
//!
//! For each partner on a contract with a non-empty email address, a
//! subject + HTML body is composed and handed to the transport, one
//! recipient at a time, in partner-list order. A failed send is logged
//! and the loop moves on; the caller never sees transport failures.

use std::sync::Arc;

use super::{MailMessage, MailTransport};
use crate::types::Partner;

/// The contract lifecycle events partners are notified about.
/// Deletions are intentionally silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractEvent {
    Created,
    Updated,
}

impl ContractEvent {
    fn subject(self) -> &'static str {
        match self {
            ContractEvent::Created => "New Contract Assignment",
            ContractEvent::Updated => "Contract Updated",
        }
    }

    fn headline(self, title: &str) -> String {
        match self {
            ContractEvent::Created => format!(
                "<p>You have been assigned to the contract: <strong>{title}</strong>.</p>"
            ),
            ContractEvent::Updated => {
                format!("<p>The contract <strong>{title}</strong> has been updated.</p>")
            }
        }
    }
}

/// Composes and dispatches contract notifications.
pub struct Notifier {
    transport: Arc<dyn MailTransport>,
    cc: Option<String>,
}

impl Notifier {
    pub fn new(transport: Arc<dyn MailTransport>, cc: Option<String>) -> Self {
        Self { transport, cc }
    }

    /// Notify every partner on the contract that has an email address.
    ///
    /// Failures are logged per recipient and never propagate; delivery
    /// continues with the remaining partners.
    pub async fn notify_partners(
        &self,
        event: ContractEvent,
        contract_title: &str,
        partners: &[Partner],
    ) {
        let all_names: Vec<&str> = partners.iter().map(|p| p.name.as_str()).collect();

        for partner in partners {
            let Some(email) = partner.email.as_deref().filter(|e| !e.is_empty()) else {
                continue;
            };

            let message = MailMessage {
                to: email.to_string(),
                cc: self.cc.clone(),
                subject: event.subject().to_string(),
                html_body: compose_body(event, contract_title, &partner.name, &all_names),
            };

            if let Err(err) = self.transport.send(&message).await {
                tracing::warn!(
                    to = %message.to,
                    contract = %contract_title,
                    error = %err,
                    "failed to send contract notification"
                );
            }
        }
    }
}

/// Build the HTML body for one recipient.
///
/// "Other partners" are everyone on the contract except the recipient,
/// matched by name. Each line is newline-terminated.
fn compose_body(
    event: ContractEvent,
    contract_title: &str,
    recipient_name: &str,
    all_names: &[&str],
) -> String {
    let others: Vec<&str> = all_names
        .iter()
        .filter(|name| **name != recipient_name)
        .copied()
        .collect();
    let others_text = if others.is_empty() {
        "No other partners.".to_string()
    } else {
        others.join(", ")
    };

    format!(
        "<p>Dear {recipient_name},</p>\n{}\n<p><strong>Other partners:</strong> {others_text}</p>\n<p>Thank you.</p>\n",
        event.headline(contract_title)
    )
}

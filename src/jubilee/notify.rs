//! # Notification Dispatcher
//!
//! Best-effort fan-out of "new post" emails to subscribed users. The
//! dispatcher is constructed once at startup and injected into the
//! repository; its report is advisory and never affects the outcome of the
//! write that triggered it.
//!
//! Without a configured transport, sends are simulated: every recipient
//! counts as delivered so the tally still matches the recipient list.

use crate::config::EmailConfig;
use crate::model::{Post, RegisteredUser};
use reqwest::blocking::Client;
use serde_json::json;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);
const SIMULATED_SEND_DELAY: Duration = Duration::from_millis(250);
const PREVIEW_CHARS: usize = 200;
const SENDER_NAME: &str = "Jubilee Blog";

/// Per-batch delivery tally. Failures are counted and described, never
/// propagated.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

struct Transport {
    client: Client,
    config: EmailConfig,
}

pub struct NotificationDispatcher {
    transport: Option<Transport>,
}

impl NotificationDispatcher {
    pub fn new(config: Option<EmailConfig>) -> Self {
        let transport = config.and_then(|config| match Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
        {
            Ok(client) => Some(Transport { client, config }),
            Err(err) => {
                warn!(error = %err, "email client unavailable, notifications will be simulated");
                None
            }
        });
        Self { transport }
    }

    pub fn unconfigured() -> Self {
        Self { transport: None }
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    /// Send a new-post notification to each recipient independently. One
    /// recipient failing does not stop delivery to the rest.
    pub fn notify(&self, recipients: &[RegisteredUser], post: &Post) -> DeliveryReport {
        match &self.transport {
            Some(transport) => Self::send_all(transport, recipients, post),
            None => Self::simulate(recipients, post),
        }
    }

    fn send_all(
        transport: &Transport,
        recipients: &[RegisteredUser],
        post: &Post,
    ) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for user in recipients {
            match Self::send_one(transport, user, post) {
                Ok(()) => {
                    debug!(recipient = %user.email, "notification sent");
                    report.success += 1;
                }
                Err(err) => {
                    report.failed += 1;
                    report
                        .errors
                        .push(format!("Failed to send email to {}: {}", user.name, err));
                }
            }
        }

        report
    }

    fn send_one(
        transport: &Transport,
        user: &RegisteredUser,
        post: &Post,
    ) -> Result<(), reqwest::Error> {
        let config = &transport.config;
        let payload = json!({
            "service_id": config.service_id,
            "template_id": config.template_id,
            "user_id": config.public_key,
            "template_params": {
                "to_email": user.email,
                "to_name": user.name,
                "from_name": SENDER_NAME,
                "post_title": post.title,
                "post_author": post.author,
                "post_content": preview(&post.content),
                "blog_url": config.blog_url,
            },
        });

        transport
            .client
            .post(&config.endpoint)
            .json(&payload)
            .send()?
            .error_for_status()?;
        Ok(())
    }

    fn simulate(recipients: &[RegisteredUser], post: &Post) -> DeliveryReport {
        if !recipients.is_empty() {
            thread::sleep(SIMULATED_SEND_DELAY);
        }
        for user in recipients {
            debug!(
                recipient = %user.email,
                title = %post.title,
                "simulated notification"
            );
        }
        DeliveryReport {
            success: recipients.len(),
            failed: 0,
            errors: Vec::new(),
        }
    }
}

/// First `PREVIEW_CHARS` characters of the body, with an ellipsis when
/// truncated. Char-based so multi-byte content cannot split.
fn preview(content: &str) -> String {
    let mut out: String = content.chars().take(PREVIEW_CHARS).collect();
    if content.chars().count() > PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscriber(name: &str) -> RegisteredUser {
        RegisteredUser::new(name, &format!("{}@example.com", name), true)
    }

    #[test]
    fn unconfigured_dispatch_simulates_full_success() {
        let dispatcher = NotificationDispatcher::unconfigured();
        let post = Post::new("amy", "News", "Body", vec![], None);
        let recipients = [subscriber("u1"), subscriber("u2"), subscriber("u3")];

        let report = dispatcher.notify(&recipients, &post);
        assert_eq!(report.success, 3);
        assert_eq!(report.failed, 0);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn empty_recipient_list_is_a_clean_no_op() {
        let dispatcher = NotificationDispatcher::unconfigured();
        let post = Post::new("amy", "News", "Body", vec![], None);
        let report = dispatcher.notify(&[], &post);
        assert_eq!(report, DeliveryReport::default());
    }

    #[test]
    fn new_without_config_is_unconfigured() {
        let dispatcher = NotificationDispatcher::new(None);
        assert!(!dispatcher.is_configured());
    }

    #[test]
    fn preview_truncates_long_content_on_char_boundary() {
        let short = preview("hello");
        assert_eq!(short, "hello");

        let long: String = "é".repeat(300);
        let cut = preview(&long);
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 3);
        assert!(cut.ends_with("..."));
    }
}

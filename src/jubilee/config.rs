use std::env;

const REMOTE_URL_VAR: &str = "JUBILEE_REMOTE_URL";
const REMOTE_KEY_VAR: &str = "JUBILEE_REMOTE_KEY";

const EMAIL_SERVICE_VAR: &str = "JUBILEE_EMAIL_SERVICE_ID";
const EMAIL_TEMPLATE_VAR: &str = "JUBILEE_EMAIL_TEMPLATE_ID";
const EMAIL_KEY_VAR: &str = "JUBILEE_EMAIL_PUBLIC_KEY";
const EMAIL_URL_VAR: &str = "JUBILEE_EMAIL_URL";
const BLOG_URL_VAR: &str = "JUBILEE_BLOG_URL";

const DEFAULT_EMAIL_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";
const DEFAULT_BLOG_URL: &str = "https://jubilee-blog.github.io";

/// Connection settings for the optional remote backend. Absent (None) when
/// either variable is missing or blank, in which case the repository runs
/// local-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub endpoint: String,
    pub api_key: String,
}

impl RemoteConfig {
    pub fn from_env() -> Option<Self> {
        Self::from_values(env::var(REMOTE_URL_VAR).ok(), env::var(REMOTE_KEY_VAR).ok())
    }

    fn from_values(endpoint: Option<String>, api_key: Option<String>) -> Option<Self> {
        let endpoint = non_blank(endpoint)?;
        let api_key = non_blank(api_key)?;
        Some(Self { endpoint, api_key })
    }
}

/// Settings for the email transport. Absent when any of the three required
/// identifiers is missing, in which case notifications are simulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub endpoint: String,
    pub blog_url: String,
}

impl EmailConfig {
    pub fn from_env() -> Option<Self> {
        Self::from_values(
            env::var(EMAIL_SERVICE_VAR).ok(),
            env::var(EMAIL_TEMPLATE_VAR).ok(),
            env::var(EMAIL_KEY_VAR).ok(),
            env::var(EMAIL_URL_VAR).ok(),
            env::var(BLOG_URL_VAR).ok(),
        )
    }

    fn from_values(
        service_id: Option<String>,
        template_id: Option<String>,
        public_key: Option<String>,
        endpoint: Option<String>,
        blog_url: Option<String>,
    ) -> Option<Self> {
        Some(Self {
            service_id: non_blank(service_id)?,
            template_id: non_blank(template_id)?,
            public_key: non_blank(public_key)?,
            endpoint: non_blank(endpoint).unwrap_or_else(|| DEFAULT_EMAIL_URL.to_string()),
            blog_url: non_blank(blog_url).unwrap_or_else(|| DEFAULT_BLOG_URL.to_string()),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_config_requires_both_values() {
        assert!(RemoteConfig::from_values(None, None).is_none());
        assert!(RemoteConfig::from_values(Some("https://x".into()), None).is_none());
        assert!(RemoteConfig::from_values(Some("   ".into()), Some("key".into())).is_none());

        let config =
            RemoteConfig::from_values(Some(" https://x ".into()), Some("key".into())).unwrap();
        assert_eq!(config.endpoint, "https://x");
        assert_eq!(config.api_key, "key");
    }

    #[test]
    fn email_config_defaults_endpoint_and_blog_url() {
        let config = EmailConfig::from_values(
            Some("svc".into()),
            Some("tpl".into()),
            Some("key".into()),
            None,
            None,
        )
        .unwrap();
        assert_eq!(config.endpoint, DEFAULT_EMAIL_URL);
        assert_eq!(config.blog_url, DEFAULT_BLOG_URL);
    }

    #[test]
    fn email_config_absent_without_identifiers() {
        assert!(EmailConfig::from_values(Some("svc".into()), None, None, None, None).is_none());
    }
}

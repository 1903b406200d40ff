//! Mail account model types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Unique identifier for a mail account.
///
/// Used verbatim as the hash field name in the account store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MailAccountId(String);

impl MailAccountId {
    /// Create a new account ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for MailAccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MailAccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MailAccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for MailAccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Security/encryption mode for connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Security {
    /// No encryption (not recommended).
    None,
    /// Implicit TLS (connect directly with TLS).
    #[default]
    Tls,
    /// STARTTLS upgrade after plaintext connect.
    StartTls,
}

/// IMAP server settings of an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImapConfig {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Security mode.
    pub security: Security,
    /// Username for authentication.
    pub username: String,
    /// Password for authentication.
    pub password: String,
}

/// SMTP server settings of an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Security mode.
    pub security: Security,
    /// Username for authentication.
    pub username: String,
    /// Password for authentication.
    pub password: String,
}

/// A mail account as persisted in the account store.
///
/// Only `id` is required in the encoded form; every other field falls back
/// to its default. Fields this type does not know about are kept in
/// [`extra`](Self::extra) and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailAccount {
    /// Primary key.
    pub id: MailAccountId,
    /// Display name for the account.
    pub name: String,
    /// Email address.
    pub email: String,
    /// IMAP configuration.
    pub imap: ImapConfig,
    /// SMTP configuration.
    pub smtp: SmtpConfig,
    /// Whether this is the default account.
    pub is_default: bool,
    /// Additional fields carried through the encoding as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl MailAccount {
    /// Create an account with only an identifier set.
    #[must_use]
    pub fn new(id: impl Into<MailAccountId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Create an account for `email`, using the address as IMAP and SMTP
    /// username.
    #[must_use]
    pub fn with_email(id: impl Into<MailAccountId>, email: &str) -> Self {
        let mut account = Self {
            id: id.into(),
            email: email.to_string(),
            ..Default::default()
        };
        account.imap.username = email.to_string();
        account.smtp.username = email.to_string();
        account
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Mark the account as the default one.
    #[must_use]
    pub const fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    mod account_id_tests {
        use super::*;

        #[test]
        fn display() {
            let id = MailAccountId::new("work");
            assert_eq!(format!("{id}"), "work");
        }

        #[test]
        fn blank() {
            assert!(MailAccountId::new("").is_blank());
            assert!(MailAccountId::new("  \t").is_blank());
            assert!(!MailAccountId::new("1").is_blank());
        }

        #[test]
        fn encodes_as_plain_string() {
            let json = serde_json::to_string(&MailAccountId::from("abc")).unwrap();
            assert_eq!(json, "\"abc\"");
        }
    }

    mod security_tests {
        use super::*;

        #[test]
        fn default_is_tls() {
            assert_eq!(Security::default(), Security::Tls);
        }

        #[test]
        fn lowercase_encoding() {
            let json = serde_json::to_string(&Security::StartTls).unwrap();
            assert_eq!(json, "\"starttls\"");
        }
    }

    mod account_tests {
        use super::*;

        #[test]
        fn new_sets_only_id() {
            let account = MailAccount::new("1");
            assert_eq!(account.id.as_str(), "1");
            assert!(account.name.is_empty());
            assert!(account.email.is_empty());
            assert!(account.extra.is_empty());
            assert!(!account.is_default);
        }

        #[test]
        fn with_email_sets_usernames() {
            let account = MailAccount::with_email("g", "user@gmail.com");
            assert_eq!(account.id.as_str(), "g");
            assert_eq!(account.email, "user@gmail.com");
            assert_eq!(account.imap.username, "user@gmail.com");
            assert_eq!(account.smtp.username, "user@gmail.com");
            assert!(account.name.is_empty());
            assert!(account.imap.host.is_empty());
            assert_eq!(account.smtp.port, 0);
        }

        #[test]
        fn decodes_id_only_record() {
            let account: MailAccount = serde_json::from_str(r#"{"id":"1"}"#).unwrap();
            assert_eq!(account, MailAccount::new("1"));
        }

        #[test]
        fn unknown_fields_round_trip() {
            let raw = r#"{"id":"7","signature":"-- sent from mailhash","quota":{"mb":512}}"#;
            let account: MailAccount = serde_json::from_str(raw).unwrap();
            assert_eq!(account.extra.len(), 2);
            assert_eq!(account.extra["quota"]["mb"], 512);

            let encoded = serde_json::to_value(&account).unwrap();
            assert_eq!(encoded["signature"], "-- sent from mailhash");
            assert_eq!(encoded["quota"]["mb"], 512);
            assert_eq!(encoded["id"], "7");
        }
    }
}

//! Request and response types for the Mailosaur API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Contact information for a message sender or recipient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageAddress {
    /// Display name, if one is specified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address (email messages).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number (SMS messages).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A hyperlink found within a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: Option<String>,
    pub text: Option<String>,
}

/// An automatically extracted verification code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Code {
    pub value: Option<String>,
}

/// An image found within a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// The `src` attribute of the image.
    pub src: Option<String>,
    /// The `alt` text of the image.
    pub alt: Option<String>,
}

/// The HTML or plain text content of a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageContent {
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub codes: Vec<Code>,
    #[serde(default)]
    pub images: Vec<Image>,
    pub body: Option<String>,
}

/// A message attachment.
///
/// `content` is only populated when sending attachments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Base64 encoded content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Content identifier for attachments embedded in the body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A single message header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageHeader {
    pub field: Option<String>,
    pub value: Option<String>,
}

/// Transport level metadata of a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub headers: Vec<MessageHeader>,
    pub ehlo: Option<String>,
    pub mail_from: Option<String>,
    #[serde(default)]
    pub rcpt_to: Vec<MessageAddress>,
}

/// Whether a message arrived as an email or an SMS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    #[default]
    Email,
    #[serde(rename = "SMS")]
    Sms,
}

/// The full detail of a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: MessageType,
    #[serde(default)]
    pub from: Vec<MessageAddress>,
    #[serde(default)]
    pub to: Vec<MessageAddress>,
    #[serde(default)]
    pub cc: Vec<MessageAddress>,
    #[serde(default)]
    pub bcc: Vec<MessageAddress>,
    pub received: Option<DateTime<Utc>>,
    pub subject: Option<String>,
    pub html: Option<MessageContent>,
    pub text: Option<MessageContent>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub metadata: Option<Metadata>,
    /// Identifier of the server holding the message.
    pub server: Option<String>,
}

/// A message in summary form, as returned by list and search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageSummary {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: MessageType,
    #[serde(default)]
    pub from: Vec<MessageAddress>,
    #[serde(default)]
    pub to: Vec<MessageAddress>,
    #[serde(default)]
    pub cc: Vec<MessageAddress>,
    #[serde(default)]
    pub bcc: Vec<MessageAddress>,
    pub received: Option<DateTime<Utc>>,
    pub subject: Option<String>,
    pub summary: Option<String>,
    /// Number of attachments.
    pub attachments: Option<u32>,
    pub server: Option<String>,
}

/// A page of message summaries, most recently received first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageListResult {
    #[serde(default)]
    pub items: Vec<MessageSummary>,
}

/// How multiple search criteria combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SearchMatch {
    #[default]
    All,
    Any,
}

/// Criteria used to find messages during a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    /// Full email address (or phone number) the message was sent from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_from: Option<String>,
    /// Full email address (or phone number) the message was sent to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_to: Option<String>,
    /// Substring to seek within the subject line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Substring to seek within the message body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_mode: Option<SearchMatch>,
}

impl SearchCriteria {
    /// Criteria matching on the sender only.
    pub fn sent_from(value: impl Into<String>) -> Self {
        Self {
            sent_from: Some(value.into()),
            ..Self::default()
        }
    }

    /// Criteria matching on the recipient only.
    pub fn sent_to(value: impl Into<String>) -> Self {
        Self {
            sent_to: Some(value.into()),
            ..Self::default()
        }
    }

    /// Criteria matching on the subject only.
    pub fn subject(value: impl Into<String>) -> Self {
        Self {
            subject: Some(value.into()),
            ..Self::default()
        }
    }

    /// Criteria matching on the body only.
    pub fn body(value: impl Into<String>) -> Self {
        Self {
            body: Some(value.into()),
            ..Self::default()
        }
    }
}

/// Options for listing messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageListOptions {
    pub received_after: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
    /// Sort direction, `"Ascending"` or `"Descending"`.
    pub dir: Option<String>,
}

/// Options for searching messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    /// How long to keep searching, in milliseconds. `None` or `0` searches once.
    pub timeout: Option<u64>,
    /// Only messages received after this instant are considered.
    pub received_after: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
    /// Fail with a timeout error when nothing matched (default `true`).
    pub error_on_timeout: Option<bool>,
    pub dir: Option<String>,
}

impl SearchOptions {
    /// Options that keep searching for up to `timeout_ms` milliseconds.
    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self {
            timeout: Some(timeout_ms),
            ..Self::default()
        }
    }
}

/// Options for creating a new message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCreateOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Send the message immediately (otherwise it is only stored).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// Options for forwarding a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageForwardOptions {
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

/// Options for replying to a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageReplyOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// A virtual server (inbox).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Server {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Users with access to the server.
    #[serde(default)]
    pub users: Vec<String>,
    /// Number of messages currently held.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerCreateOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerListResult {
    #[serde(default)]
    pub items: Vec<Server>,
}

/// Outcome of a single deliverability or spam check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisResult {
    Pass,
    Warning,
    Fail,
    Timeout,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpamAssassinRule {
    pub score: Option<f64>,
    pub rule: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpamFilterResults {
    #[serde(default)]
    pub spam_assassin: Vec<SpamAssassinRule>,
}

/// Result of a spam analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpamAnalysisResult {
    pub spam_filter_results: Option<SpamFilterResults>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAuthenticationResult {
    pub result: Option<AnalysisResult>,
    pub description: Option<String>,
    pub raw_value: Option<String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockListResult {
    pub id: String,
    pub name: String,
    pub result: AnalysisResult,
}

/// Content checks performed during a deliverability report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub embed: bool,
    pub iframe: bool,
    pub object: bool,
    pub script: bool,
    pub short_urls: bool,
    pub text_size: u64,
    pub total_size: u64,
    pub missing_alt: bool,
    pub missing_list_unsubscribe: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DnsRecords {
    #[serde(default)]
    pub a: Vec<String>,
    #[serde(default)]
    pub mx: Vec<String>,
    #[serde(default)]
    pub ptr: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpamAssassinResult {
    pub score: f64,
    pub result: AnalysisResult,
    #[serde(default)]
    pub rules: Vec<SpamAssassinRule>,
}

/// Deliverability report of an email.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverabilityReport {
    pub spf: Option<EmailAuthenticationResult>,
    #[serde(default)]
    pub dkim: Vec<EmailAuthenticationResult>,
    pub dmarc: Option<EmailAuthenticationResult>,
    #[serde(default)]
    pub block_lists: Vec<BlockListResult>,
    pub content: Option<Content>,
    pub dns_records: Option<DnsRecords>,
    pub spam_assassin: Option<SpamAssassinResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageAccountLimit {
    pub limit: Option<u64>,
    pub current: Option<u64>,
}

/// Current limits and usage of the account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageAccountLimits {
    pub servers: Option<UsageAccountLimit>,
    pub users: Option<UsageAccountLimit>,
    pub email: Option<UsageAccountLimit>,
    pub sms: Option<UsageAccountLimit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageTransaction {
    pub timestamp: Option<DateTime<Utc>>,
    pub email: Option<u64>,
    pub sms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageTransactionListResult {
    #[serde(default)]
    pub items: Vec<UsageTransaction>,
}

/// A virtual security device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCreateOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Base32 encoded shared secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_secret: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceListResult {
    #[serde(default)]
    pub items: Vec<Device>,
}

/// A one-time password and its expiry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtpResult {
    pub code: Option<String>,
    pub expires: Option<DateTime<Utc>>,
}

/// A requested email preview.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub id: Option<String>,
    pub email_client: Option<String>,
    pub disable_images: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewListResult {
    #[serde(default)]
    pub items: Vec<Preview>,
}

/// An email client that previews can be generated for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailClient {
    pub label: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailClientListResult {
    #[serde(default)]
    pub items: Vec<EmailClient>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequestOptions {
    pub email_clients: Vec<String>,
}

//! # Mailosaur Client
//! Asynchronous wrapper around the Mailosaur email and SMS testing HTTP API, providing methods to manage virtual servers, send and receive messages, and wait for a matching message to arrive, using [`Client`] and [`ClientBuilder`].
//!
//! ## Audience and uses
//! For Rust developers writing end-to-end tests that need to check what their product actually sent: configure with [`ClientBuilder`] (or the `MAILOSAUR_*` environment variables), trigger an email or SMS, then wait for it with [`Client::get_message`] or [`Client::search_messages`] and assert on its content, links and codes.
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest`. Waiting between search attempts uses Tokio timers, so other tasks keep running while a search is pending.
//!
//! ## Waiting for messages
//! Searches with a timeout are retried until a message matches, following the delay schedule the service suggests (one second by default). Only "no match yet" is retried: authentication failures, invalid parameters and server errors end the search at once. Running out of time is an [`Error::PollTimeout`] unless [`SearchOptions::error_on_timeout`] is `Some(false)`, in which case the empty page is returned.
//!
//! ## Errors
//! Network failures surface as [`Error::Request`] and non-success statuses as [`Error::Api`]; both report `true` from [`Error::is_transport`]. Missing credentials fail at construction with [`Error::Configuration`]. The crate-wide [`Result`] alias wraps these errors.
//!
//! ## Logging
//! Requests and search attempts emit `tracing` events at `debug` and `trace` level. No subscriber is installed by this crate.
//!
//! ## Example
//! ```no_run
//! use mailosaur_client::{Client, SearchCriteria, SearchOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mailosaur_client::Error> {
//!     let client = Client::from_env()?;
//!     let address = client.generate_email_address("abcd1234");
//!
//!     // ... make your product send an email to `address` ...
//!
//!     let message = client
//!         .get_message(
//!             "abcd1234",
//!             &SearchCriteria::sent_to(&address),
//!             &SearchOptions::with_timeout(20_000),
//!         )
//!         .await?;
//!     println!("Subject: {:?}", message.subject);
//!
//!     client.delete_all_messages("abcd1234").await?;
//!     Ok(())
//! }
//! ```

mod analysis;
mod client;
mod devices;
mod error;
mod files;
mod messages;
mod models;
mod poll;
mod previews;
mod servers;
mod usage;

pub use client::{Client, ClientBuilder};
pub use error::Error;
pub use models::{
    AnalysisResult, Attachment, BlockListResult, Code, Content, DeliverabilityReport, Device,
    DeviceCreateOptions, DeviceListResult, DnsRecords, EmailAuthenticationResult, EmailClient,
    EmailClientListResult, Image, Link, Message, MessageAddress, MessageContent,
    MessageCreateOptions, MessageForwardOptions, MessageHeader, MessageListOptions,
    MessageListResult, MessageReplyOptions, MessageSummary, MessageType, Metadata, OtpResult,
    Preview, PreviewListResult, PreviewRequestOptions, SearchCriteria, SearchMatch, SearchOptions,
    Server, ServerCreateOptions, ServerListResult, SpamAnalysisResult, SpamAssassinResult,
    SpamAssassinRule, SpamFilterResults, UsageAccountLimit, UsageAccountLimits, UsageTransaction,
    UsageTransactionListResult,
};
pub use poll::{DelaySchedule, Effect, Event, Outcome, PollConfig, PollState};

/// Result type alias for Mailosaur operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

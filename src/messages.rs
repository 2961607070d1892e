//! Message endpoints, including search with polling.

use crate::models::{
    Message, MessageCreateOptions, MessageForwardOptions, MessageListOptions, MessageListResult,
    MessageReplyOptions, SearchCriteria, SearchOptions,
};
use crate::poll::{self, PollConfig, Polled, Probe};
use crate::{Client, Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use std::time::Duration;

/// Timeout applied to each individual search request.
const SEARCH_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Search budget used by [`Client::get_message`] when none is given.
const DEFAULT_GET_TIMEOUT_MS: u64 = 10_000;

/// How far back [`Client::get_message`] looks when `received_after` is unset.
const DEFAULT_LOOKBACK_HOURS: i64 = 1;

/// Query string shared by list and search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery<'a> {
    server: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    items_per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    received_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dir: Option<&'a str>,
}

impl<'a> ListQuery<'a> {
    fn new(
        server: &'a str,
        page: Option<u32>,
        items_per_page: Option<u32>,
        received_after: Option<DateTime<Utc>>,
        dir: Option<&'a str>,
    ) -> Self {
        Self {
            server,
            page,
            items_per_page,
            received_after: received_after
                .map(|at| at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            dir,
        }
    }
}

impl Client {
    /// List messages of a server in summary form, most recently received first.
    ///
    /// # Arguments
    /// * `server_id` - The server to list
    /// * `options` - Paging and filtering options
    pub async fn list_messages(
        &self,
        server_id: &str,
        options: &MessageListOptions,
    ) -> Result<MessageListResult> {
        let query = ListQuery::new(
            server_id,
            options.page,
            options.items_per_page,
            options.received_after,
            options.dir.as_deref(),
        );

        let response = self
            .send(self.request(Method::GET, "api/messages").query(&query))
            .await?;
        Ok(response.json().await?)
    }

    /// Create a new message, optionally sending it to a verified address.
    pub async fn create_message(
        &self,
        server_id: &str,
        options: &MessageCreateOptions,
    ) -> Result<Message> {
        let request = self
            .request(Method::POST, "api/messages")
            .query(&[("server", server_id)])
            .json(options);
        Ok(self.send(request).await?.json().await?)
    }

    /// Forward a message to a verified email address.
    pub async fn forward_message(
        &self,
        message_id: &str,
        options: &MessageForwardOptions,
    ) -> Result<Message> {
        self.post_json(&format!("api/messages/{message_id}/forward"), options)
            .await
    }

    /// Reply to a message, as a user of your product would.
    pub async fn reply_to_message(
        &self,
        message_id: &str,
        options: &MessageReplyOptions,
    ) -> Result<Message> {
        self.post_json(&format!("api/messages/{message_id}/reply"), options)
            .await
    }

    /// Wait for a single message matching `criteria` and return its full detail.
    ///
    /// Only the most recent match is considered. `options` are not modified:
    /// the search always asks for page 0 with one item, defaults the timeout
    /// to 10 seconds and `received_after` to one hour ago.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailosaur_client::{Client, SearchCriteria, SearchOptions};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailosaur_client::Error> {
    /// let client = Client::from_env()?;
    /// let message = client
    ///     .get_message(
    ///         "abcd1234",
    ///         &SearchCriteria::sent_to("anything@abcd1234.mailosaur.net"),
    ///         &SearchOptions::default(),
    ///     )
    ///     .await?;
    /// println!("{:?}", message.subject);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_message(
        &self,
        server_id: &str,
        criteria: &SearchCriteria,
        options: &SearchOptions,
    ) -> Result<Message> {
        let options = single_message_options(options, Utc::now());
        let page = self.search_messages(server_id, criteria, &options).await?;

        let summary = page.items.first().ok_or(Error::NoMatch)?;
        self.get_message_by_id(&summary.id).await
    }

    /// Retrieve the full detail of a message by its identifier.
    pub async fn get_message_by_id(&self, message_id: &str) -> Result<Message> {
        self.get_json(&format!("api/messages/{message_id}")).await
    }

    /// Search a server for messages matching `criteria`.
    ///
    /// With `options.timeout` unset or zero the search runs once. Otherwise it
    /// is repeated, following the delays the service suggests, until at least
    /// one message matches or the timeout would be exceeded. Running out of
    /// time fails with [`Error::PollTimeout`] unless `error_on_timeout` is
    /// `Some(false)`, in which case the empty page is returned.
    ///
    /// Transport failures end the search immediately.
    pub async fn search_messages(
        &self,
        server_id: &str,
        criteria: &SearchCriteria,
        options: &SearchOptions,
    ) -> Result<MessageListResult> {
        let config = PollConfig::new(options.timeout, options.error_on_timeout);
        let query = ListQuery::new(
            server_id,
            options.page,
            options.items_per_page,
            options.received_after,
            options.dir.as_deref(),
        );
        // Serialized once so every attempt sends identical bytes.
        let body = serde_json::to_vec(criteria)?;

        let (query, payload) = (&query, body.as_slice());
        let polled = poll::drive(config, move || self.search_once(query, payload)).await?;

        match polled {
            Polled::Ready(page) | Polled::Pending(page) => Ok(page),
            Polled::TimedOut => Err(Error::PollTimeout {
                criteria: String::from_utf8_lossy(&body).into_owned(),
                timeout_ms: config.timeout_ms(),
            }),
        }
    }

    /// Messages whose subject contains `subject`.
    pub async fn get_messages_by_subject(
        &self,
        server_id: &str,
        subject: &str,
    ) -> Result<MessageListResult> {
        self.search_messages(
            server_id,
            &SearchCriteria::subject(subject),
            &SearchOptions::default(),
        )
        .await
    }

    /// Messages whose body contains `body`.
    pub async fn get_messages_by_body(
        &self,
        server_id: &str,
        body: &str,
    ) -> Result<MessageListResult> {
        self.search_messages(
            server_id,
            &SearchCriteria::body(body),
            &SearchOptions::default(),
        )
        .await
    }

    /// Messages sent from `sent_from` (an email address or phone number).
    pub async fn get_messages_by_sent_from(
        &self,
        server_id: &str,
        sent_from: &str,
    ) -> Result<MessageListResult> {
        self.search_messages(
            server_id,
            &SearchCriteria::sent_from(sent_from),
            &SearchOptions::default(),
        )
        .await
    }

    /// Messages sent to `sent_to` (an email address or phone number).
    pub async fn get_messages_by_sent_to(
        &self,
        server_id: &str,
        sent_to: &str,
    ) -> Result<MessageListResult> {
        self.search_messages(
            server_id,
            &SearchCriteria::sent_to(sent_to),
            &SearchOptions::default(),
        )
        .await
    }

    /// Permanently delete a message and its attachments.
    pub async fn delete_message(&self, message_id: &str) -> Result<()> {
        self.delete(&format!("api/messages/{message_id}")).await
    }

    /// Permanently delete every message held by a server.
    pub async fn delete_all_messages(&self, server_id: &str) -> Result<()> {
        let request = self
            .request(Method::DELETE, "api/messages")
            .query(&[("server", server_id)]);
        self.send(request).await?;
        Ok(())
    }

    /// One search attempt.
    async fn search_once(
        &self,
        query: &ListQuery<'_>,
        criteria: &[u8],
    ) -> Result<Probe<MessageListResult>> {
        let request = self
            .request(Method::POST, "api/messages/search")
            .query(query)
            .header(CONTENT_TYPE, "application/json")
            .body(criteria.to_vec())
            .timeout(SEARCH_REQUEST_TIMEOUT);

        let response = self.send(request).await?;
        let delay = poll::suggested_delay(response.headers());
        let page: MessageListResult = response.json().await?;

        tracing::debug!(matches = page.items.len(), ?delay, "search attempt finished");

        Ok(Probe {
            ready: !page.items.is_empty(),
            value: page,
            delay,
        })
    }
}

/// Options for a single-message search, derived without touching the caller's.
fn single_message_options(options: &SearchOptions, now: DateTime<Utc>) -> SearchOptions {
    SearchOptions {
        page: Some(0),
        items_per_page: Some(1),
        timeout: Some(
            options
                .timeout
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_GET_TIMEOUT_MS),
        ),
        received_after: Some(
            options
                .received_after
                .unwrap_or_else(|| now - chrono::Duration::hours(DEFAULT_LOOKBACK_HOURS)),
        ),
        ..options.clone()
    }
}

//! File downloads.

use crate::{Client, Result};
use reqwest::Method;

impl Client {
    /// Download the raw content of an attachment.
    pub async fn download_attachment(&self, attachment_id: &str) -> Result<Vec<u8>> {
        let response = self
            .send(self.request(
                Method::GET,
                &format!("api/files/attachments/{attachment_id}"),
            ))
            .await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Download an email as an EML document.
    pub async fn download_message(&self, message_id: &str) -> Result<String> {
        let response = self
            .send(self.request(Method::GET, &format!("api/files/email/{message_id}")))
            .await?;
        Ok(response.text().await?)
    }
}

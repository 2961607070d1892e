//! Server (inbox) endpoints.

use crate::models::{Server, ServerCreateOptions, ServerListResult};
use crate::{Client, Result};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::Deserialize;

/// Length of the random local part of generated addresses.
const LOCAL_PART_LEN: usize = 10;

#[derive(Debug, Deserialize)]
struct ServerPassword {
    value: String,
}

impl Client {
    /// List your virtual servers, sorted alphabetically.
    pub async fn list_servers(&self) -> Result<ServerListResult> {
        self.get_json("api/servers").await
    }

    /// Create a new virtual server.
    pub async fn create_server(&self, options: &ServerCreateOptions) -> Result<Server> {
        self.post_json("api/servers", options).await
    }

    /// Retrieve a single server.
    pub async fn get_server(&self, server_id: &str) -> Result<Server> {
        self.get_json(&format!("api/servers/{server_id}")).await
    }

    /// Retrieve the SMTP/POP3/IMAP password of a server.
    pub async fn get_server_password(&self, server_id: &str) -> Result<String> {
        let password: ServerPassword = self
            .get_json(&format!("api/servers/{server_id}/password"))
            .await?;
        Ok(password.value)
    }

    /// Update the attributes of a server.
    pub async fn update_server(&self, server_id: &str, server: &Server) -> Result<Server> {
        self.put_json(&format!("api/servers/{server_id}"), server)
            .await
    }

    /// Permanently delete a server along with all of its messages.
    pub async fn delete_server(&self, server_id: &str) -> Result<()> {
        self.delete(&format!("api/servers/{server_id}")).await
    }

    /// Generate a random address that delivers to `server_id`.
    ///
    /// No request is made; the address uses the configured SMTP host.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailosaur_client::Client;
    /// # fn main() -> Result<(), mailosaur_client::Error> {
    /// let client = Client::new("your-api-key")?;
    /// let address = client.generate_email_address("abcd1234");
    /// assert!(address.ends_with("@abcd1234.mailosaur.net"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn generate_email_address(&self, server_id: &str) -> String {
        let local: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(LOCAL_PART_LEN)
            .map(|byte| char::from(byte).to_ascii_lowercase())
            .collect();

        format!("{local}@{server_id}.{}", self.smtp_host())
    }
}

//! Virtual security devices and one-time passwords.

use crate::models::{Device, DeviceCreateOptions, DeviceListResult, OtpResult};
use crate::{Client, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OtpRequest<'a> {
    shared_secret: &'a str,
}

impl Client {
    /// List your virtual security devices.
    pub async fn list_devices(&self) -> Result<DeviceListResult> {
        self.get_json("api/devices").await
    }

    /// Create a new virtual security device.
    pub async fn create_device(&self, options: &DeviceCreateOptions) -> Result<Device> {
        self.post_json("api/devices", options).await
    }

    /// Current one-time password for a device.
    ///
    /// `query` is either a device identifier or a base32 encoded shared
    /// secret. Device identifiers always contain a `-`, shared secrets never do.
    pub async fn get_device_otp(&self, query: &str) -> Result<OtpResult> {
        if is_device_id(query) {
            return self.get_json(&format!("api/devices/{query}/otp")).await;
        }

        self.post_json(
            "api/devices/otp",
            &OtpRequest {
                shared_secret: query,
            },
        )
        .await
    }

    /// Permanently delete a device.
    pub async fn delete_device(&self, device_id: &str) -> Result<()> {
        self.delete(&format!("api/devices/{device_id}")).await
    }
}

fn is_device_id(query: &str) -> bool {
    query.is_empty() || query.contains('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tells_device_ids_from_secrets() {
        assert!(is_device_id("4a0b5c9e-6d1f-4b0c-8f3e-2b1a0c9d8e7f"));
        assert!(is_device_id(""));
        assert!(!is_device_id("ONSWG4TFOQYTEMY="));
    }
}

//! Account usage.
//!
//! Both endpoints require an account-level API key.

use crate::models::{UsageAccountLimits, UsageTransactionListResult};
use crate::{Client, Result};

impl Client {
    /// Current limits and usage of the account.
    pub async fn get_usage_limits(&self) -> Result<UsageAccountLimits> {
        self.get_json("api/usage/limits").await
    }

    /// Transactional usage over the last 31 days.
    pub async fn get_usage_transactions(&self) -> Result<UsageTransactionListResult> {
        self.get_json("api/usage/transactions").await
    }
}

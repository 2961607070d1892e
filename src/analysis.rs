//! Spam and deliverability analysis.

use crate::models::{DeliverabilityReport, SpamAnalysisResult};
use crate::{Client, Result};

impl Client {
    /// Run a SpamAssassin analysis of an email.
    pub async fn get_spam_analysis(&self, message_id: &str) -> Result<SpamAnalysisResult> {
        self.get_json(&format!("api/analysis/spam/{message_id}"))
            .await
    }

    /// Produce a deliverability report (SPF, DKIM, DMARC, block lists, content) of an email.
    pub async fn get_deliverability_report(
        &self,
        message_id: &str,
    ) -> Result<DeliverabilityReport> {
        self.get_json(&format!("api/analysis/deliverability/{message_id}"))
            .await
    }
}

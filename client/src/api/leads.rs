//! Lead-management endpoints (back office).

use super::{Api, parse, parse_list};
use crate::error::Result;
use crate::tokens::TokenStore;
use crate::transport::{ApiRequest, HttpTransport};
use crate::types::{Lead, LeadStatus};
use serde_json::json;
use uuid::Uuid;

/// Lead-management endpoints.
pub struct LeadEndpoints<'a, T: HttpTransport, K: TokenStore> {
    pub(crate) api: &'a Api<T, K>,
}

impl<T: HttpTransport, K: TokenStore> LeadEndpoints<'_, T, K> {
    /// List leads, optionally filtered by funnel state.
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::Forbidden`] for non-back-office callers.
    pub async fn list(&self, status: Option<LeadStatus>) -> Result<Vec<Lead>> {
        let mut request = ApiRequest::get("/leads/");
        if let Some(status) = status {
            request = request.with_query("status", status.as_str());
        }

        let response = self.api.request(request).await?;
        parse_list(response)
    }

    /// Fetch a single lead.
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::NotFound`] for an unknown id.
    pub async fn get(&self, id: Uuid) -> Result<Lead> {
        let response = self.api.request(ApiRequest::get(format!("/leads/{id}/"))).await?;
        parse(response)
    }

    /// Update a lead's funnel state and notes.
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::Validation`] on rejected fields.
    pub async fn update(
        &self,
        id: Uuid,
        status: LeadStatus,
        notes: Option<&str>,
    ) -> Result<Lead> {
        let mut body = json!({ "status": status });
        if let Some(notes) = notes {
            body["notes"] = json!(notes);
        }

        let response = self
            .api
            .request(ApiRequest::patch(format!("/leads/{id}/")).with_body(body))
            .await?;
        parse(response)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::testing::{api_without_tokens, response};
    use serde_json::json;

    #[tokio::test]
    async fn list_passes_status_filter() {
        let (api, transport) = api_without_tokens(vec![response(200, json!({"results": []}))]);

        let leads = api.leads().list(Some(LeadStatus::New)).await.unwrap();

        assert!(leads.is_empty());
        assert_eq!(
            transport.requests()[0].query,
            vec![("status".to_string(), "new".to_string())]
        );
    }

    #[tokio::test]
    async fn update_patches_status_and_notes() {
        let (api, transport) = api_without_tokens(vec![response(
            403,
            json!({"detail": "forbidden"}),
        )]);

        let id = Uuid::nil();
        let _ = api
            .leads()
            .update(id, LeadStatus::Contacted, Some("called twice"))
            .await;

        let body = transport.requests()[0].body.clone().unwrap();
        assert_eq!(body["status"], json!("contacted"));
        assert_eq!(body["notes"], json!("called twice"));
    }
}

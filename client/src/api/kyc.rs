//! KYC submission and review endpoints.

use super::{Api, parse, parse_list};
use crate::error::Result;
use crate::tokens::TokenStore;
use crate::transport::{ApiRequest, HttpTransport, MultipartForm};
use crate::types::{KycStatus, KycSubmission, ReviewAction};
use serde_json::json;
use uuid::Uuid;

/// KYC endpoints.
pub struct KycEndpoints<'a, T: HttpTransport, K: TokenStore> {
    pub(crate) api: &'a Api<T, K>,
}

impl<T: HttpTransport, K: TokenStore> KycEndpoints<'_, T, K> {
    /// The authenticated user's KYC state.
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::Unauthorized`] without a live session.
    pub async fn status(&self) -> Result<KycStatus> {
        let response = self.api.request(ApiRequest::get("/kyc/status/")).await?;
        parse(response)
    }

    /// Submit an identity document for verification.
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::Validation`] when a submission is already
    /// pending or the document is rejected.
    pub async fn submit(
        &self,
        full_name: &str,
        document_filename: &str,
        document_content_type: &str,
        document_bytes: Vec<u8>,
    ) -> Result<KycStatus> {
        let form = MultipartForm::new().text("full_name", full_name).file(
            "document_photo",
            document_filename,
            document_content_type,
            document_bytes,
        );

        let response = self
            .api
            .request(ApiRequest::post("/kyc/submit/").with_multipart(form))
            .await?;
        parse(response)
    }

    /// List submissions waiting for review (back office).
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::Forbidden`] for non-reviewer callers.
    pub async fn pending(&self) -> Result<Vec<KycSubmission>> {
        let response = self.api.request(ApiRequest::get("/kyc/pending/")).await?;
        parse_list(response)
    }

    /// Review a submission (back office).
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::Validation`] when rejecting without a reason.
    pub async fn review(
        &self,
        id: Uuid,
        action: ReviewAction,
        rejection_reason: Option<&str>,
    ) -> Result<()> {
        let mut body = json!({ "action": action });
        if let Some(reason) = rejection_reason {
            body["rejection_reason"] = json!(reason);
        }

        self.api
            .request(ApiRequest::post(format!("/kyc/{id}/review/")).with_body(body))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::testing::{api_without_tokens, response};
    use crate::transport::MultipartValue;
    use serde_json::json;

    #[tokio::test]
    async fn submit_builds_multipart_form() {
        let (api, transport) = api_without_tokens(vec![response(
            200,
            json!({"has_submission": true, "is_verified": false, "can_submit": false}),
        )]);

        let status = api
            .kyc()
            .submit("Ada Lovelace", "id.jpg", "image/jpeg", vec![0xFF, 0xD8])
            .await
            .unwrap();

        assert!(status.has_submission);
        let requests = transport.requests();
        let form = requests[0].multipart.as_ref().unwrap();
        assert_eq!(form.parts().len(), 2);
        assert!(matches!(
            &form.parts()[0].1,
            MultipartValue::Text(name) if name == "Ada Lovelace"
        ));
    }

    #[tokio::test]
    async fn review_includes_reason_only_when_rejecting() {
        let (api, transport) = api_without_tokens(vec![
            response(200, json!({})),
            response(200, json!({})),
        ]);

        let id = Uuid::nil();
        api.kyc().review(id, ReviewAction::Approve, None).await.unwrap();
        api.kyc()
            .review(id, ReviewAction::Reject, Some("document unreadable"))
            .await
            .unwrap();

        let requests = transport.requests();
        let approve = requests[0].body.as_ref().unwrap();
        assert_eq!(approve["action"], json!("approve"));
        assert!(approve.get("rejection_reason").is_none());

        let reject = requests[1].body.as_ref().unwrap();
        assert_eq!(reject["action"], json!("reject"));
        assert_eq!(reject["rejection_reason"], json!("document unreadable"));
    }
}

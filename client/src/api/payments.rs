//! Payment-proof endpoints.

use super::{Api, parse, parse_list};
use crate::error::Result;
use crate::tokens::TokenStore;
use crate::transport::{ApiRequest, HttpTransport, MultipartForm};
use crate::types::{PaymentProof, ReviewAction};
use serde_json::json;
use uuid::Uuid;

/// Payment-proof endpoints.
pub struct PaymentEndpoints<'a, T: HttpTransport, K: TokenStore> {
    pub(crate) api: &'a Api<T, K>,
}

impl<T: HttpTransport, K: TokenStore> PaymentEndpoints<'_, T, K> {
    /// Upload a bank-transfer proof for an investment.
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::Validation`] when the investment is not awaiting
    /// payment or the amount mismatches.
    pub async fn upload_proof(
        &self,
        investment_id: Uuid,
        amount: f64,
        proof_filename: &str,
        proof_content_type: &str,
        proof_bytes: Vec<u8>,
    ) -> Result<PaymentProof> {
        let form = MultipartForm::new()
            .text("investment_id", investment_id.to_string())
            .text("amount", amount.to_string())
            .file("proof_image", proof_filename, proof_content_type, proof_bytes);

        let response = self
            .api
            .request(ApiRequest::post("/payments/proof/").with_multipart(form))
            .await?;
        parse(response)
    }

    /// List proofs waiting for review (back office).
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::Forbidden`] for non-reviewer callers.
    pub async fn pending(&self) -> Result<Vec<PaymentProof>> {
        let response = self.api.request(ApiRequest::get("/payments/pending/")).await?;
        parse_list(response)
    }

    /// Review a proof (back office).
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
            .request(ApiRequest::post(format!("/payments/{id}/review/")).with_body(body))
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
    async fn upload_carries_investment_and_image() {
        let (api, transport) = api_without_tokens(vec![response(
            403,
            json!({"detail": "forbidden"}),
        )]);

        let investment_id = Uuid::nil();
        let _ = api
            .payments()
            .upload_proof(investment_id, 1000.0, "proof.png", "image/png", vec![1, 2])
            .await;

        let requests = transport.requests();
        let form = requests[0].multipart.as_ref().unwrap();
        assert_eq!(form.parts().len(), 3);
        assert!(matches!(
            &form.parts()[2].1,
            MultipartValue::File { filename, .. } if filename == "proof.png"
        ));
    }
}

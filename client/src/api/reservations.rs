//! Reservation endpoints.

use super::{Api, parse, parse_list};
use crate::error::{ApiError, Result};
use crate::tokens::TokenStore;
use crate::transport::{ApiRequest, HttpTransport};
use crate::types::{Investment, Reservation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reservation creation payload.
///
/// Reservations are open to anonymous visitors, so contact details travel
/// with the request instead of coming from a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationRequest {
    /// Contact email.
    pub email: String,
    /// Contact name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Project to reserve in.
    pub project_id: Uuid,
    /// Amount to reserve.
    pub amount: f64,
}

/// Reservation endpoints.
pub struct ReservationEndpoints<'a, T: HttpTransport, K: TokenStore> {
    pub(crate) api: &'a Api<T, K>,
}

impl<T: HttpTransport, K: TokenStore> ReservationEndpoints<'_, T, K> {
    /// Create a reservation.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] on rejected fields (amount below minimum,
    /// project not funding).
    pub async fn create(&self, payload: &ReservationRequest) -> Result<Reservation> {
        let body =
            serde_json::to_value(payload).map_err(|e| ApiError::ParseFailed(e.to_string()))?;
        let response = self
            .api
            .request(ApiRequest::post("/reservations/").with_body(body))
            .await?;
        parse(response)
    }

    /// Fetch a reservation by its access token.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] for an unknown token.
    pub async fn get(&self, token: &str) -> Result<Reservation> {
        let response = self
            .api
            .request(ApiRequest::get(format!("/reservations/{token}/")))
            .await?;
        parse(response)
    }

    /// List the authenticated user's reservations.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] without a live session.
    pub async fn mine(&self) -> Result<Vec<Reservation>> {
        let response = self.api.request(ApiRequest::get("/reservations/my/")).await?;
        parse_list(response)
    }

    /// Convert a reservation into an investment.
    ///
    /// Requires a verified (KYC-approved) session; the server enforces
    /// the policy.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] when the reservation is expired or the
    /// user is not verified.
    pub async fn convert(&self, token: &str) -> Result<Investment> {
        let response = self
            .api
            .request(ApiRequest::post(format!("/reservations/{token}/convert/")))
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
    async fn create_serializes_contact_details() {
        let (api, transport) = api_without_tokens(vec![response(
            400,
            json!({"amount": ["below project minimum"]}),
        )]);

        let payload = ReservationRequest {
            email: "visitor@example.com".to_string(),
            name: Some("Visitor".to_string()),
            phone: None,
            project_id: Uuid::nil(),
            amount: 50.0,
        };
        let result = api.reservations().create(&payload).await;

        let Err(ApiError::Validation(errors)) = result else {
            unreachable!("expected validation error");
        };
        assert_eq!(errors.first_message(), Some("below project minimum"));

        let body = transport.requests()[0].body.clone().unwrap();
        assert_eq!(body["email"], json!("visitor@example.com"));
        assert!(body.get("phone").is_none());
    }

    #[tokio::test]
    async fn convert_posts_to_token_path() {
        let (api, transport) = api_without_tokens(vec![response(
            404,
            json!({"detail": "not found"}),
        )]);

        let result = api.reservations().convert("res-token-1").await;

        assert!(matches!(result, Err(ApiError::NotFound)));
        assert_eq!(
            transport.requests()[0].path,
            "/reservations/res-token-1/convert/"
        );
    }
}

//! Investment endpoints.

use super::{Api, parse, parse_list};
use crate::error::Result;
use crate::tokens::TokenStore;
use crate::transport::{ApiRequest, HttpTransport};
use crate::types::{Investment, ReturnProjection};
use serde_json::json;
use uuid::Uuid;

/// Investment endpoints.
pub struct InvestmentEndpoints<'a, T: HttpTransport, K: TokenStore> {
    pub(crate) api: &'a Api<T, K>,
}

impl<T: HttpTransport, K: TokenStore> InvestmentEndpoints<'_, T, K> {
    /// List the authenticated user's investments.
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::Unauthorized`] without a live session.
    pub async fn list(&self) -> Result<Vec<Investment>> {
        let response = self.api.request(ApiRequest::get("/investments/")).await?;
        parse_list(response)
    }

    /// Fetch a single investment.
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::NotFound`] for an unknown or foreign id.
    pub async fn get(&self, id: Uuid) -> Result<Investment> {
        let response = self
            .api
            .request(ApiRequest::get(format!("/investments/{id}/")))
            .await?;
        parse(response)
    }

    /// Create an investment directly (without a reservation).
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::Validation`] when the amount is below the
    /// project minimum or the user is not verified.
    pub async fn create(&self, project_id: Uuid, amount: f64) -> Result<Investment> {
        let response = self
            .api
            .request(
                ApiRequest::post("/investments/create/")
                    .with_body(json!({ "project_id": project_id, "amount": amount })),
            )
            .await?;
        parse(response)
    }

    /// Fetch the server-computed return projection for an investment.
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::NotFound`] for an unknown or foreign id.
    pub async fn projection(&self, id: Uuid) -> Result<ReturnProjection> {
        let response = self
            .api
            .request(ApiRequest::get(format!("/investments/{id}/projection/")))
            .await?;
        parse(response)
    }
}

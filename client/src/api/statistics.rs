//! Statistics endpoints (back office).

use super::{Api, parse, parse_list};
use crate::error::Result;
use crate::tokens::TokenStore;
use crate::transport::{ApiRequest, HttpTransport};
use crate::types::{ExecutiveStatistics, PlatformStatistics};

/// Statistics endpoints.
pub struct StatisticsEndpoints<'a, T: HttpTransport, K: TokenStore> {
    pub(crate) api: &'a Api<T, K>,
}

impl<T: HttpTransport, K: TokenStore> StatisticsEndpoints<'_, T, K> {
    /// Platform-wide aggregate figures.
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::Forbidden`] for non-back-office callers.
    pub async fn platform(&self) -> Result<PlatformStatistics> {
        let response = self
            .api
            .request(ApiRequest::get("/statistics/platform/"))
            .await?;
        parse(response)
    }

    /// Per-executive conversion figures.
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::Forbidden`] for non-admin callers.
    pub async fn executives(&self) -> Result<Vec<ExecutiveStatistics>> {
        let response = self
            .api
            .request(ApiRequest::get("/statistics/executives/"))
            .await?;
        parse_list(response)
    }
}

//! Project catalogue endpoints.

use super::{Api, parse, parse_list};
use crate::error::Result;
use crate::tokens::TokenStore;
use crate::transport::{ApiRequest, HttpTransport, MultipartForm};
use crate::types::{Project, ReturnEstimate};
use serde_json::json;

/// Project catalogue endpoints.
pub struct ProjectEndpoints<'a, T: HttpTransport, K: TokenStore> {
    pub(crate) api: &'a Api<T, K>,
}

impl<T: HttpTransport, K: TokenStore> ProjectEndpoints<'_, T, K> {
    /// List projects, optionally restricted to featured ones.
    ///
    /// # Errors
    ///
    /// Transport and API errors.
    pub async fn list(&self, featured: Option<bool>) -> Result<Vec<Project>> {
        let mut request = ApiRequest::get("/projects/");
        if let Some(featured) = featured {
            request = request.with_query("featured", featured.to_string());
        }

        let response = self.api.request(request).await?;
        parse_list(response)
    }

    /// Fetch a single project by slug.
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::NotFound`] for an unknown slug.
    pub async fn get(&self, slug: &str) -> Result<Project> {
        let response = self
            .api
            .request(ApiRequest::get(format!("/projects/{slug}/")))
            .await?;
        parse(response)
    }

    /// Ask the server to compute the return for a prospective amount.
    ///
    /// The computation is owned by the API; the client never replicates
    /// the formula.
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::Validation`] for amounts below the project
    /// minimum.
    pub async fn calculate_return(&self, slug: &str, amount: f64) -> Result<ReturnEstimate> {
        let response = self
            .api
            .request(
                ApiRequest::post(format!("/projects/{slug}/calculate-return/"))
                    .with_body(json!({ "amount": amount })),
            )
            .await?;
        parse(response)
    }

    /// Create a project (back office; multipart for the cover image).
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::Forbidden`] for non-admin callers,
    /// [`crate::ApiError::Validation`] on rejected fields.
    pub async fn create(&self, form: MultipartForm) -> Result<Project> {
        let response = self
            .api
            .request(ApiRequest::post("/projects/").with_multipart(form))
            .await?;
        parse(response)
    }

    /// Update a project (back office; multipart for image replacement).
    ///
    /// # Errors
    ///
    /// Same as [`ProjectEndpoints::create`].
    pub async fn update(&self, slug: &str, form: MultipartForm) -> Result<Project> {
        let response = self
            .api
            .request(ApiRequest::patch(format!("/projects/{slug}/")).with_multipart(form))
            .await?;
        parse(response)
    }

    /// Delete a project (back office).
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::Forbidden`] for non-admin callers.
    pub async fn delete(&self, slug: &str) -> Result<()> {
        self.api
            .request(ApiRequest::delete(format!("/projects/{slug}/")))
            .await?;
        Ok(())
    }
}

//! Structured cache keys.
//!
//! A key addresses one server-state resource: a name, optional extra path
//! parts (ids, slugs), and optional filter parameters. Invalidation is
//! prefix-based, so invalidating `leads` also marks `leads?status=new`
//! stale — dependent filtered views re-fetch together with the base list.

use serde_json::Value;

/// Structured identifier for a cached server-state entry.
///
/// # Examples
///
/// ```
/// use ladrillo_cache::QueryKey;
/// use serde_json::json;
///
/// let all = QueryKey::new("leads");
/// let filtered = QueryKey::new("leads").with_params(json!({"status": "new"}));
///
/// assert!(filtered.matches_prefix(&all));
/// assert!(!all.matches_prefix(&filtered));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    parts: Vec<String>,
    /// Canonical JSON rendering of the filter parameters.
    ///
    /// Stored as a string so keys hash; `serde_json` maps are ordered, so
    /// equal parameter sets render identically.
    params: Option<String>,
}

impl QueryKey {
    /// A key for the given resource name.
    #[must_use]
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            parts: vec![resource.into()],
            params: None,
        }
    }

    /// Append a path part (an id, a slug).
    #[must_use]
    pub fn with_part(mut self, part: impl ToString) -> Self {
        self.parts.push(part.to_string());
        self
    }

    /// Attach filter parameters.
    #[must_use]
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params.to_string());
        self
    }

    /// Whether this key falls under `prefix`.
    ///
    /// True when the prefix's parts lead this key's parts and the prefix
    /// either carries no parameters or carries the same ones. Matching is
    /// reflexive.
    #[must_use]
    pub fn matches_prefix(&self, prefix: &QueryKey) -> bool {
        if !self.parts.starts_with(&prefix.parts) {
            return false;
        }

        match &prefix.params {
            None => true,
            Some(params) => self.params.as_ref() == Some(params),
        }
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.parts.join("/"))?;
        if let Some(params) = &self.params {
            write!(f, "?{params}")?;
        }
        Ok(())
    }
}

/// The key vocabulary used by the platform pages.
///
/// Pages and mutations agree on these functions instead of re-spelling
/// key literals, which keeps invalidation sets in one place.
pub mod keys {
    use super::QueryKey;
    use ladrillo_client::types::LeadStatus;
    use serde_json::json;
    use uuid::Uuid;

    /// All projects.
    #[must_use]
    pub fn projects() -> QueryKey {
        QueryKey::new("projects")
    }

    /// Featured projects (landing page).
    #[must_use]
    pub fn featured_projects() -> QueryKey {
        QueryKey::new("projects").with_part("featured")
    }

    /// One project by slug.
    #[must_use]
    pub fn project(slug: &str) -> QueryKey {
        QueryKey::new("project").with_part(slug)
    }

    /// The user's investments.
    #[must_use]
    pub fn investments() -> QueryKey {
        QueryKey::new("investments")
    }

    /// One investment.
    #[must_use]
    pub fn investment(id: Uuid) -> QueryKey {
        QueryKey::new("investment").with_part(id)
    }

    /// Return projection for one investment.
    #[must_use]
    pub fn investment_projection(id: Uuid) -> QueryKey {
        QueryKey::new("investment-projection").with_part(id)
    }

    /// The user's reservations.
    #[must_use]
    pub fn reservations() -> QueryKey {
        QueryKey::new("reservations")
    }

    /// The user's KYC state.
    #[must_use]
    pub fn kyc_status() -> QueryKey {
        QueryKey::new("kyc-status")
    }

    /// KYC submissions awaiting review (back office).
    #[must_use]
    pub fn pending_kyc() -> QueryKey {
        QueryKey::new("pending-kyc")
    }

    /// Payment proofs awaiting review (back office).
    #[must_use]
    pub fn pending_payments() -> QueryKey {
        QueryKey::new("pending-payments")
    }

    /// All leads (back office).
    #[must_use]
    pub fn leads() -> QueryKey {
        QueryKey::new("leads")
    }

    /// Leads filtered by funnel state (back office).
    #[must_use]
    pub fn leads_with_status(status: LeadStatus) -> QueryKey {
        QueryKey::new("leads").with_params(json!({ "status": status.as_str() }))
    }

    /// Platform statistics (back office).
    #[must_use]
    pub fn platform_statistics() -> QueryKey {
        QueryKey::new("platform-statistics")
    }

    /// Per-executive statistics (back office).
    #[must_use]
    pub fn executive_statistics() -> QueryKey {
        QueryKey::new("executive-statistics")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefix_matching() {
        let leads = QueryKey::new("leads");
        let filtered = QueryKey::new("leads").with_params(json!({"status": "new"}));
        let investment = QueryKey::new("investment").with_part("abc");

        assert!(filtered.matches_prefix(&leads));
        assert!(investment.matches_prefix(&QueryKey::new("investment")));
        assert!(!leads.matches_prefix(&filtered));
        assert!(!investment.matches_prefix(&leads));
    }

    #[test]
    fn test_params_are_canonical() {
        // Object key order does not change identity.
        let a = QueryKey::new("leads").with_params(json!({"a": 1, "b": 2}));
        let b = QueryKey::new("leads").with_params(json!({"b": 2, "a": 1}));
        assert_eq!(a, b);
    }

    #[test]
    fn test_display() {
        let key = keys::leads_with_status(ladrillo_client::types::LeadStatus::New);
        assert_eq!(key.to_string(), "leads?{\"status\":\"new\"}");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prefix_matching_is_reflexive(parts in proptest::collection::vec("[a-z-]{1,12}", 1..4)) {
                let mut key = QueryKey::new(parts[0].clone());
                for part in &parts[1..] {
                    key = key.with_part(part);
                }
                prop_assert!(key.matches_prefix(&key));
            }

            #[test]
            fn extending_a_key_keeps_the_prefix_match(
                parts in proptest::collection::vec("[a-z-]{1,12}", 1..4),
                extra in "[a-z0-9-]{1,12}",
            ) {
                let mut base = QueryKey::new(parts[0].clone());
                for part in &parts[1..] {
                    base = base.with_part(part);
                }
                let extended = base.clone().with_part(extra);

                prop_assert!(extended.matches_prefix(&base));
                prop_assert!(!base.matches_prefix(&extended));
            }
        }
    }
}

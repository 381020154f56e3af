//! Wire DTOs for the platform API.
//!
//! Field names and value vocabularies mirror the REST contract exactly.
//! Money fields are decimal strings as served by the API; the client never
//! recomputes them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ═══════════════════════════════════════════════════════════════════════
// Users
// ═══════════════════════════════════════════════════════════════════════

/// Platform role attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular investor account.
    Investor,
    /// Sales executive (lead management, statistics).
    Executive,
    /// Platform administrator.
    Admin,
}

impl Role {
    /// Role name as served on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Investor => "investor",
            Self::Executive => "executive",
            Self::Admin => "admin",
        }
    }
}

/// Authenticated user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Login email.
    pub email: String,
    /// First name (may be empty).
    #[serde(default)]
    pub first_name: String,
    /// Last name (may be empty).
    #[serde(default)]
    pub last_name: String,
    /// Contact phone (may be empty).
    #[serde(default)]
    pub phone: String,
    /// Platform role.
    pub role: Role,
    /// Whether the identity-verification workflow has approved this user.
    pub is_kyc_verified: bool,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

// ═══════════════════════════════════════════════════════════════════════
// Projects
// ═══════════════════════════════════════════════════════════════════════

/// Funding lifecycle state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Not yet published.
    Draft,
    /// Open for investment.
    Funding,
    /// Target reached, not yet started.
    Funded,
    /// Under construction/operation.
    InProgress,
    /// Finished and settled.
    Completed,
    /// Cancelled before completion.
    Cancelled,
}

/// Gallery image attached to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectImage {
    /// Image identifier.
    pub id: Uuid,
    /// Image URL.
    pub image: String,
    /// Caption text.
    #[serde(default)]
    pub caption: String,
    /// Display order.
    pub order: u32,
}

/// Real-estate project open to crowdfunding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier.
    pub id: Uuid,
    /// Display title.
    pub title: String,
    /// URL slug (the public identifier used in paths).
    pub slug: String,
    /// Full description.
    pub description: String,
    /// Card/summary description.
    pub short_description: String,
    /// City/region label.
    pub location: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Funding target (decimal string).
    pub target_amount: String,
    /// Amount raised so far (decimal string).
    pub current_amount: String,
    /// Remaining amount to target (decimal string).
    pub remaining_amount: String,
    /// Minimum single investment (decimal string).
    pub minimum_investment: String,
    /// Annual return rate in percent (decimal string).
    pub annual_return_rate: String,
    /// Investment term in months.
    pub duration_months: u32,
    /// Cover image URL.
    #[serde(default)]
    pub main_image: String,
    /// Gallery images.
    #[serde(default)]
    pub images: Vec<ProjectImage>,
    /// Funding lifecycle state.
    pub status: ProjectStatus,
    /// Human-readable status label from the API.
    pub status_display: String,
    /// Funding progress in percent (decimal string).
    pub funding_progress: String,
    /// Number of distinct investors.
    pub investor_count: u32,
    /// Whether the project is featured on the landing page.
    pub is_featured: bool,
    /// First day of the funding window.
    pub funding_start_date: NaiveDate,
    /// Last day of the funding window.
    pub funding_end_date: NaiveDate,
    /// Planned project start.
    pub project_start_date: Option<NaiveDate>,
    /// Planned project end.
    pub project_end_date: Option<NaiveDate>,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Server-computed return estimate for a prospective amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnEstimate {
    /// Monthly return (decimal string).
    pub monthly_return: String,
    /// Total return over the term (decimal string).
    pub total_return: String,
    /// Principal plus total return (decimal string).
    pub final_amount: String,
}

// ═══════════════════════════════════════════════════════════════════════
// Reservations
// ═══════════════════════════════════════════════════════════════════════

/// Reservation lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Awaiting conversion.
    Pending,
    /// Converted into an investment.
    Converted,
    /// Expired before conversion.
    Expired,
    /// Cancelled.
    Cancelled,
}

/// Time-limited, pre-investment intent record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Unique reservation identifier.
    pub id: Uuid,
    /// Contact email of the reserver.
    pub email: String,
    /// Contact name.
    #[serde(default)]
    pub name: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: String,
    /// Reserved project identifier.
    pub project: Uuid,
    /// Reserved project title (denormalized for display).
    pub project_title: String,
    /// Reserved amount (decimal string).
    pub amount: String,
    /// Lifecycle state.
    pub status: ReservationStatus,
    /// Human-readable status label from the API.
    pub status_display: String,
    /// Opaque token used to address this reservation.
    pub access_token: String,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
    /// Whether the reservation window has passed.
    pub is_expired: bool,
    /// Whether the reservation can currently be converted.
    pub can_convert: bool,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

// ═══════════════════════════════════════════════════════════════════════
// Investments
// ═══════════════════════════════════════════════════════════════════════

/// Investment lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentStatus {
    /// Created, waiting for the investor's transfer.
    PendingPayment,
    /// Payment proof uploaded, under review.
    PaymentReview,
    /// Payment confirmed, accruing returns.
    Active,
    /// Term finished.
    Completed,
    /// Cancelled.
    Cancelled,
}

/// A confirmed or in-progress investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    /// Unique investment identifier.
    pub id: Uuid,
    /// Funded project identifier.
    pub project: Uuid,
    /// Funded project title (denormalized for display).
    pub project_title: String,
    /// Invested amount (decimal string).
    pub amount: String,
    /// Lifecycle state.
    pub status: InvestmentStatus,
    /// Human-readable status label from the API.
    pub status_display: String,
    /// Annual return rate captured at investment time (decimal string).
    pub annual_return_rate_snapshot: String,
    /// Term in months captured at investment time.
    pub duration_months_snapshot: u32,
    /// Expected return so far (decimal string).
    pub expected_return: String,
    /// Actual return so far (decimal string).
    pub actual_return: String,
    /// Total projected return over the term (decimal string).
    pub total_projected_return: String,
    /// Monthly return (decimal string).
    pub monthly_return: String,
    /// When the investment was activated.
    pub activated_at: Option<DateTime<Utc>>,
    /// Expected end of term.
    pub expected_end_date: Option<NaiveDate>,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Server-computed projection for an existing investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnProjection {
    /// Investment identifier the projection belongs to.
    pub investment: Uuid,
    /// Annual return rate (decimal string).
    pub annual_return_rate: String,
    /// Monthly return (decimal string).
    pub monthly_return: String,
    /// Total return over the term (decimal string).
    pub total_return: String,
    /// Principal plus total return (decimal string).
    pub final_amount: String,
    /// Term in months.
    pub duration_months: u32,
}

// ═══════════════════════════════════════════════════════════════════════
// KYC
// ═══════════════════════════════════════════════════════════════════════

/// Review outcome states shared by KYC submissions and payment proofs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Waiting for a reviewer.
    Pending,
    /// Approved.
    Approved,
    /// Rejected (see `rejection_reason`).
    Rejected,
}

/// Decision submitted by a reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    /// Accept the submission.
    Approve,
    /// Reject the submission; a reason is expected.
    Reject,
}

/// The investor-facing view of their KYC state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KycStatus {
    /// Whether a submission exists at all.
    pub has_submission: bool,
    /// Whether the user is verified.
    pub is_verified: bool,
    /// Whether a (new) submission is currently allowed.
    pub can_submit: bool,
    /// Optional server-provided message.
    #[serde(default)]
    pub message: Option<String>,
    /// The latest submission, when one exists.
    #[serde(default)]
    pub submission: Option<KycStatusSubmission>,
}

/// Submission summary nested inside [`KycStatus`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KycStatusSubmission {
    /// Submission identifier.
    pub id: Uuid,
    /// Review state.
    pub status: ReviewStatus,
    /// Human-readable status label from the API.
    pub status_display: String,
    /// Reviewer-provided reason when rejected.
    #[serde(default)]
    pub rejection_reason: String,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
    /// Review timestamp, once reviewed.
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// The reviewer-facing view of a KYC submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KycSubmission {
    /// Submission identifier.
    pub id: Uuid,
    /// Submitting user identifier.
    pub user: Uuid,
    /// Submitting user's email (denormalized for display).
    pub user_email: String,
    /// Declared full legal name.
    pub full_name: String,
    /// URL of the uploaded identity document.
    pub document_photo: String,
    /// Review state.
    pub status: ReviewStatus,
    /// Human-readable status label from the API.
    pub status_display: String,
    /// Reviewer-provided reason when rejected.
    #[serde(default)]
    pub rejection_reason: String,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
    /// Review timestamp, once reviewed.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Reviewer identifier, once reviewed.
    pub reviewed_by: Option<Uuid>,
}

// ═══════════════════════════════════════════════════════════════════════
// Payments
// ═══════════════════════════════════════════════════════════════════════

/// A bank-transfer proof uploaded for an investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentProof {
    /// Proof identifier.
    pub id: Uuid,
    /// Investment the proof belongs to.
    pub investment: Uuid,
    /// Investor's email (denormalized for display).
    pub investor_email: String,
    /// Project title (denormalized for display).
    pub project_title: String,
    /// Investment amount (decimal string).
    pub investment_amount: String,
    /// URL of the uploaded proof image.
    pub proof_image: String,
    /// Transferred amount as declared by the investor (decimal string).
    pub amount: String,
    /// Issuing bank, when provided.
    #[serde(default)]
    pub bank_name: String,
    /// Bank transaction reference, when provided.
    #[serde(default)]
    pub transaction_reference: String,
    /// Transfer date, when provided.
    pub transaction_date: Option<NaiveDate>,
    /// Review state.
    pub status: ReviewStatus,
    /// Human-readable status label from the API.
    pub status_display: String,
    /// Reviewer-provided reason when rejected.
    #[serde(default)]
    pub rejection_reason: String,
    /// Upload timestamp.
    pub created_at: DateTime<Utc>,
    /// Review timestamp, once reviewed.
    pub reviewed_at: Option<DateTime<Utc>>,
}

// ═══════════════════════════════════════════════════════════════════════
// Leads
// ═══════════════════════════════════════════════════════════════════════

/// Where a lead entered the funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    /// Contact form on the website.
    Website,
    /// Created from an unconverted reservation.
    Reservation,
    /// Pushed in from an external integration.
    Webhook,
}

/// Funnel state of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    /// Not yet contacted.
    New,
    /// Contacted by an executive.
    Contacted,
    /// Qualified as a prospect.
    Qualified,
    /// Became an investor.
    Converted,
    /// Dropped out of the funnel.
    Lost,
}

impl LeadStatus {
    /// Status name as served on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Qualified => "qualified",
            Self::Converted => "converted",
            Self::Lost => "lost",
        }
    }
}

/// A sales lead in the back office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    /// Lead identifier.
    pub id: Uuid,
    /// Contact email.
    pub email: String,
    /// Contact name.
    #[serde(default)]
    pub name: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: String,
    /// Funnel entry point.
    pub source: LeadSource,
    /// Human-readable source label from the API.
    pub source_display: String,
    /// Funnel state.
    pub status: LeadStatus,
    /// Human-readable status label from the API.
    pub status_display: String,
    /// Assigned executive, when assigned.
    pub assigned_to: Option<Uuid>,
    /// Assigned executive's name, when assigned.
    pub assigned_to_name: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Related project, when known.
    pub project: Option<Uuid>,
    /// Related project title, when known.
    pub project_title: Option<String>,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

// ═══════════════════════════════════════════════════════════════════════
// Statistics
// ═══════════════════════════════════════════════════════════════════════

/// Platform-wide aggregate figures for the back-office dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformStatistics {
    /// Total amount invested across the platform.
    pub total_invested: f64,
    /// Number of distinct investors.
    pub total_investors: u64,
    /// Number of projects.
    pub total_projects: u64,
    /// Number of currently active investments.
    pub active_investments: u64,
    /// KYC submissions waiting for review.
    pub pending_kyc: u64,
    /// Payment proofs waiting for review.
    pub pending_payments: u64,
    /// Total leads in the funnel.
    pub total_leads: u64,
    /// Leads created this calendar month.
    pub leads_this_month: u64,
}

/// Per-executive lead conversion figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveStatistics {
    /// Executive's user identifier.
    pub id: Uuid,
    /// Executive's email.
    pub email: String,
    /// Executive's display name.
    pub name: String,
    /// Leads assigned in total.
    pub total_leads: u64,
    /// Leads not yet contacted.
    pub new_leads: u64,
    /// Leads converted into investors.
    pub converted_leads: u64,
    /// Conversion percentage.
    pub conversion_rate: f64,
}

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Account role. Stored in `users.role` as the variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    RecipeDeveloper,
    Nutritionist,
}

impl Role {
    pub const ALL: &'static [Role] = &[Role::RecipeDeveloper, Role::Nutritionist];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::RecipeDeveloper => "RecipeDeveloper",
            Role::Nutritionist => "Nutritionist",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|role| role.as_str() == s)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review state of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    PendingVerification,
    Verified,
    NeedsRevision,
}

impl VerificationStatus {
    pub const ALL: &'static [VerificationStatus] = &[
        VerificationStatus::PendingVerification,
        VerificationStatus::Verified,
        VerificationStatus::NeedsRevision,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::PendingVerification => "pending_verification",
            VerificationStatus::Verified => "verified",
            VerificationStatus::NeedsRevision => "needs_revision",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|status| status.as_str() == s)
    }

    /// Only verified recipes may appear on public surfaces.
    pub fn is_public(&self) -> bool {
        matches!(self, VerificationStatus::Verified)
    }

    /// Verified recipes are read-only for every content-mutation path.
    pub fn is_locked(&self) -> bool {
        matches!(self, VerificationStatus::Verified)
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "image" => Some(MediaType::Image),
            "video" => Some(MediaType::Video),
            _ => None,
        }
    }
}

/// Where a recipe's nutrition figures came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NutritionSource {
    EstimatedApi,
    VerifiedNutritionist,
}

impl NutritionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutritionSource::EstimatedApi => "estimated_api",
            NutritionSource::VerifiedNutritionist => "verified_nutritionist",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "estimated_api" => Some(NutritionSource::EstimatedApi),
            "verified_nutritionist" => Some(NutritionSource::VerifiedNutritionist),
            _ => None,
        }
    }
}

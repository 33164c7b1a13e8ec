//! License capability interface.
//!
//! Feature gating is injected as a [`LicenseProvider`] rather than read from
//! global state, so tests and deployments can supply their own license.

use serde::{Deserialize, Serialize};

/// Known license feature names.
pub mod features {
    pub const COMPLIANCE: &str = "compliance";
}

/// Feature flags granted by a license.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseFeatures {
    pub compliance: bool,
}

/// An installed license.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub features: LicenseFeatures,
}

impl License {
    /// Build a license from a comma-separated feature list such as
    /// `"compliance"`. Unknown names are returned as an error.
    pub fn from_feature_list(list: &str) -> Result<Self, String> {
        let mut features = LicenseFeatures::default();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match name {
                features::COMPLIANCE => features.compliance = true,
                other => return Err(format!("Unknown license feature '{other}'")),
            }
        }
        Ok(Self { features })
    }
}

/// Capability query used to gate compliance-only operations.
pub trait LicenseProvider: Send + Sync {
    /// The currently installed license, if any.
    fn license(&self) -> Option<License>;

    /// Whether the compliance feature is available.
    fn allows_compliance(&self) -> bool {
        self.license().is_some_and(|l| l.features.compliance)
    }
}

/// A license fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticLicense(pub Option<License>);

impl LicenseProvider for StaticLicense {
    fn license(&self) -> Option<License> {
        self.0.clone()
    }
}

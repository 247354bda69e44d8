//! Service configuration.

use kanri_domain::WorkspaceInvitation;

use crate::CoreError;

/// Tunables for the service layer.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    /// How long a freshly created invitation stays acceptable.
    pub invitation_expiry_days: i64,

    /// Window for the "due soon" card query.
    pub due_soon_days: i64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            invitation_expiry_days: WorkspaceInvitation::DEFAULT_EXPIRY_DAYS,
            due_soon_days: 3,
        }
    }
}

impl CoreConfig {
    /// Create a configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, CoreError> {
        let mut config = Self::default();
        if let Ok(v) = std::env::var("KANRI_INVITATION_EXPIRY_DAYS") {
            config.invitation_expiry_days = v.parse().map_err(|_| {
                CoreError::Config(format!(
                    "Invalid KANRI_INVITATION_EXPIRY_DAYS value '{}': expected a number",
                    v
                ))
            })?;
        }
        if let Ok(v) = std::env::var("KANRI_DUE_SOON_DAYS") {
            config.due_soon_days = v.parse().map_err(|_| {
                CoreError::Config(format!(
                    "Invalid KANRI_DUE_SOON_DAYS value '{}': expected a number",
                    v
                ))
            })?;
        }
        Ok(config)
    }

    /// Create a test configuration (for development/testing).
    pub fn test() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_domain_defaults() {
        let config = CoreConfig::default();
        assert_eq!(config.invitation_expiry_days, 7);
        assert_eq!(config.due_soon_days, 3);
    }
}

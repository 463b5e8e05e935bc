//! Environment resolution - deployment parameters from the process environment
//!
//! Reads go through [`EnvSource`] so callers can resolve against a plain map
//! without touching process state.

use crate::error::{ConfigurationError, Result};
use crate::types::{DEFAULT_REGION, DeploymentParameters};
use std::collections::HashMap;

/// Variables holding the account id, in lookup order
pub const ACCOUNT_VARS: &[&str] = &["CDK_DEFAULT_ACCOUNT", "ACCOUNT_ID"];

/// Variables holding the region, in lookup order
pub const REGION_VARS: &[&str] = &["CDK_DEFAULT_REGION", "REGION"];

/// Source of environment variables
pub trait EnvSource {
    /// Look up a variable, returning `None` when unset
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| (*v).to_string())
    }
}

/// Resolve the deployment parameters
///
/// The account id is required; the region falls back to [`DEFAULT_REGION`].
/// Empty values count as unset.
pub fn resolve<E: EnvSource + ?Sized>(env: &E) -> Result<DeploymentParameters> {
    let account_id = first_non_empty(env, ACCOUNT_VARS).ok_or_else(|| {
        ConfigurationError::MissingRequiredParameter {
            name: ACCOUNT_VARS[0].to_string(),
        }
    })?;

    let region = first_non_empty(env, REGION_VARS).unwrap_or_else(|| {
        log::debug!("No region configured, using {DEFAULT_REGION}");
        DEFAULT_REGION.to_string()
    });

    Ok(DeploymentParameters { account_id, region })
}

fn first_non_empty<E: EnvSource + ?Sized>(env: &E, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| env.var(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

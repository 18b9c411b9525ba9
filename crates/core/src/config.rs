//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the dispatch centre, so
//! request handling never reads process-wide environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::DEFAULT_ASSESSMENT_TIMEOUT;
use crate::error::{DispatchError, DispatchResult};
use crate::hospital::HospitalRegistry;
use crate::mission::Location;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    assessment_timeout: Duration,
    hospitals_file: Option<PathBuf>,
    ambulance_location: Location,
}

impl CoreConfig {
    /// Creates a validated configuration.
    ///
    /// # Arguments
    ///
    /// * `assessment_timeout` - Upper bound on each assessor call.
    /// * `hospitals_file` - Optional YAML seed; `None` selects the demonstration network.
    /// * `ambulance_location` - Static unit position shown with the mission.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::InvalidInput` for a zero timeout or a coordinate outside
    /// latitude/longitude range.
    pub fn new(
        assessment_timeout: Duration,
        hospitals_file: Option<PathBuf>,
        ambulance_location: Location,
    ) -> DispatchResult<Self> {
        if assessment_timeout.is_zero() {
            return Err(DispatchError::InvalidInput(
                "assessment timeout must be greater than zero".into(),
            ));
        }
        if !ambulance_location.lat.is_finite()
            || !ambulance_location.lon.is_finite()
            || !(-90.0..=90.0).contains(&ambulance_location.lat)
            || !(-180.0..=180.0).contains(&ambulance_location.lon)
        {
            return Err(DispatchError::InvalidInput(
                "ambulance location is not a valid coordinate".into(),
            ));
        }

        Ok(Self {
            assessment_timeout,
            hospitals_file,
            ambulance_location,
        })
    }

    pub fn assessment_timeout(&self) -> Duration {
        self.assessment_timeout
    }

    pub fn hospitals_file(&self) -> Option<&Path> {
        self.hospitals_file.as_deref()
    }

    pub fn ambulance_location(&self) -> Location {
        self.ambulance_location
    }

    /// Registry from the configured seed file, or the demonstration network.
    ///
    /// # Errors
    ///
    /// Returns `RegistryFileRead`/`RegistryFileParse` when the seed cannot be read or decoded,
    /// and `InvalidInput` when its entries fail registry validation.
    pub fn load_registry(&self) -> DispatchResult<HospitalRegistry> {
        match &self.hospitals_file {
            Some(path) => HospitalRegistry::from_yaml_file(path),
            None => Ok(HospitalRegistry::demo_network()),
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            assessment_timeout: DEFAULT_ASSESSMENT_TIMEOUT,
            hospitals_file: None,
            ambulance_location: Location::default(),
        }
    }
}

/// Parse the assessor timeout from an optional seconds value.
///
/// `None` or blank yields the default.
///
/// # Errors
///
/// Returns `DispatchError::InvalidInput` if the value is not a whole number of seconds or is
/// zero.
pub fn assessment_timeout_from_env_value(value: Option<String>) -> DispatchResult<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(DEFAULT_ASSESSMENT_TIMEOUT),
        Some(v) => {
            let secs: u64 = v.parse().map_err(|_| {
                DispatchError::InvalidInput(format!("assessment timeout is not a number: {v}"))
            })?;
            if secs == 0 {
                return Err(DispatchError::InvalidInput(
                    "assessment timeout must be greater than zero".into(),
                ));
            }
            Ok(Duration::from_secs(secs))
        }
    }
}

/// Parse an optional hospital seed file path; blank means "use the demo network".
pub fn hospitals_file_from_env_value(value: Option<String>) -> Option<PathBuf> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_from_env_value() {
        assert_eq!(
            assessment_timeout_from_env_value(None).unwrap(),
            DEFAULT_ASSESSMENT_TIMEOUT
        );
        assert_eq!(
            assessment_timeout_from_env_value(Some("  ".into())).unwrap(),
            DEFAULT_ASSESSMENT_TIMEOUT
        );
        assert_eq!(
            assessment_timeout_from_env_value(Some("5".into())).unwrap(),
            Duration::from_secs(5)
        );
        assert!(assessment_timeout_from_env_value(Some("0".into())).is_err());
        assert!(assessment_timeout_from_env_value(Some("soon".into())).is_err());
    }

    #[test]
    fn test_new_rejects_bad_values() {
        assert!(CoreConfig::new(Duration::ZERO, None, Location::default()).is_err());
        assert!(CoreConfig::new(
            Duration::from_secs(1),
            None,
            Location {
                lat: 91.0,
                lon: 0.0
            }
        )
        .is_err());
    }

    #[test]
    fn test_load_registry_defaults_to_demo_network() {
        let cfg = CoreConfig::default();
        assert_eq!(cfg.load_registry().unwrap(), HospitalRegistry::demo_network());
        assert!(hospitals_file_from_env_value(Some(" ".into())).is_none());
    }

    #[test]
    fn test_load_registry_missing_file() {
        let cfg = CoreConfig::new(
            Duration::from_secs(1),
            Some(PathBuf::from("/nonexistent/hospitals.yaml")),
            Location::default(),
        )
        .unwrap();
        assert!(matches!(
            cfg.load_registry(),
            Err(DispatchError::RegistryFileRead(_))
        ));
    }
}

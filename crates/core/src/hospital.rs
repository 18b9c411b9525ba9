//! Hospital registry.
//!
//! The registry keeps hospitals in insertion order; that order is the tie-break whenever two
//! hospitals are ranked equally by the matching engine. Bed counts are only ever changed through
//! [`HospitalRegistry::decrement_bed`], which refuses to go below zero.

use std::collections::HashSet;
use std::path::Path;

use resq_types::WardType;
use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, DispatchResult};

/// A receiving facility and its current vacancy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Hospital {
    pub name: String,
    pub specialty: String,
    /// Static road distance from the unit, in kilometres.
    pub distance_km: f64,
    pub icu_beds: u32,
    pub op_beds: u32,
    pub lat: f64,
    pub lon: f64,
}

impl Hospital {
    /// Available beds for the given ward type.
    pub fn beds(&self, ward: WardType) -> u32 {
        match ward {
            WardType::Icu => self.icu_beds,
            WardType::Op => self.op_beds,
        }
    }

    fn beds_mut(&mut self, ward: WardType) -> &mut u32 {
        match ward {
            WardType::Icu => &mut self.icu_beds,
            WardType::Op => &mut self.op_beds,
        }
    }
}

/// Network-wide vacancy totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CensusTotals {
    pub icu_beds: u32,
    pub op_beds: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HospitalRegistry {
    hospitals: Vec<Hospital>,
}

impl HospitalRegistry {
    /// Builds a registry from seed entries in the order given.
    ///
    /// # Errors
    /// Returns `InvalidInput` for an empty or duplicate name, a negative or non-finite distance,
    /// or bed counts whose network total does not fit in `u32`.
    pub fn new(hospitals: Vec<Hospital>) -> DispatchResult<Self> {
        let mut seen = HashSet::new();
        for hospital in &hospitals {
            if hospital.name.trim().is_empty() {
                return Err(DispatchError::InvalidInput(
                    "hospital name cannot be empty".into(),
                ));
            }
            if !seen.insert(hospital.name.as_str()) {
                return Err(DispatchError::InvalidInput(format!(
                    "duplicate hospital name: {}",
                    hospital.name
                )));
            }
            if !hospital.distance_km.is_finite() || hospital.distance_km < 0.0 {
                return Err(DispatchError::InvalidInput(format!(
                    "hospital {} has an invalid distance",
                    hospital.name
                )));
            }
        }
        if checked_totals(&hospitals).is_none() {
            return Err(DispatchError::InvalidInput(
                "network bed totals exceed the supported range".into(),
            ));
        }

        Ok(Self { hospitals })
    }

    /// The three-facility demonstration network.
    pub fn demo_network() -> Self {
        let hospital = |name: &str, specialty: &str, distance_km, icu_beds, op_beds, lat, lon| {
            Hospital {
                name: name.into(),
                specialty: specialty.into(),
                distance_km,
                icu_beds,
                op_beds,
                lat,
                lon,
            }
        };

        Self {
            hospitals: vec![
                hospital(
                    "City General Trauma",
                    "Level 1 Trauma",
                    5.0,
                    2,
                    15,
                    37.7749,
                    -122.4194,
                ),
                hospital(
                    "Metropolitan Heart",
                    "Cardiology Center",
                    12.0,
                    8,
                    5,
                    37.7849,
                    -122.4094,
                ),
                hospital(
                    "Suburban Clinic",
                    "General Care",
                    3.0,
                    0,
                    20,
                    37.7649,
                    -122.4294,
                ),
            ],
        }
    }

    /// Loads a registry from a YAML list of hospitals.
    pub fn from_yaml_file(path: &Path) -> DispatchResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(DispatchError::RegistryFileRead)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> DispatchResult<Self> {
        let hospitals: Vec<Hospital> =
            serde_yaml::from_str(contents).map_err(DispatchError::RegistryFileParse)?;
        Self::new(hospitals)
    }

    pub fn list_all(&self) -> &[Hospital] {
        &self.hospitals
    }

    pub fn get(&self, name: &str) -> DispatchResult<&Hospital> {
        self.hospitals
            .iter()
            .find(|h| h.name == name)
            .ok_or_else(|| DispatchError::HospitalNotFound(name.to_owned()))
    }

    /// Takes one bed of `ward` at `name`.
    ///
    /// # Returns
    /// The number of beds of that ward left at the hospital.
    ///
    /// # Errors
    /// `HospitalNotFound` for an unknown name; `BedsExhausted` when the count is already zero,
    /// in which case the registry is unchanged.
    pub fn decrement_bed(&mut self, name: &str, ward: WardType) -> DispatchResult<u32> {
        let hospital = self
            .hospitals
            .iter_mut()
            .find(|h| h.name == name)
            .ok_or_else(|| DispatchError::HospitalNotFound(name.to_owned()))?;

        let beds = hospital.beds_mut(ward);
        if *beds == 0 {
            return Err(DispatchError::BedsExhausted {
                hospital: name.to_owned(),
                ward,
            });
        }
        *beds -= 1;
        Ok(*beds)
    }

    /// Per-ward vacancy across the network.
    ///
    /// # Returns
    /// Free ICU and OP beds summed over every hospital.
    pub fn census(&self) -> CensusTotals {
        self.hospitals.iter().fold(
            CensusTotals {
                icu_beds: 0,
                op_beds: 0,
            },
            |acc, h| CensusTotals {
                icu_beds: acc.icu_beds.saturating_add(h.icu_beds),
                op_beds: acc.op_beds.saturating_add(h.op_beds),
            },
        )
    }
}

fn checked_totals(hospitals: &[Hospital]) -> Option<CensusTotals> {
    hospitals.iter().try_fold(
        CensusTotals {
            icu_beds: 0,
            op_beds: 0,
        },
        |acc, h| {
            Some(CensusTotals {
                icu_beds: acc.icu_beds.checked_add(h.icu_beds)?,
                op_beds: acc.op_beds.checked_add(h.op_beds)?,
            })
        },
    )
}

impl Default for HospitalRegistry {
    fn default() -> Self {
        Self::demo_network()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample(name: &str, distance_km: f64) -> Hospital {
        Hospital {
            name: name.into(),
            specialty: "General Care".into(),
            distance_km,
            icu_beds: 1,
            op_beds: 0,
            lat: 0.0,
            lon: 0.0,
        }
    }

    #[test]
    fn test_demo_network_census() {
        let registry = HospitalRegistry::demo_network();
        assert_eq!(registry.list_all().len(), 3);
        assert_eq!(
            registry.census(),
            CensusTotals {
                icu_beds: 10,
                op_beds: 40
            }
        );
        assert_eq!(
            registry.get("Suburban Clinic").unwrap().beds(WardType::Icu),
            0
        );
    }

    #[test]
    fn test_get_unknown_hospital() {
        let registry = HospitalRegistry::demo_network();
        assert!(matches!(
            registry.get("Nowhere General"),
            Err(DispatchError::HospitalNotFound(name)) if name == "Nowhere General"
        ));
    }

    #[test]
    fn test_decrement_bed_stops_at_zero() {
        let mut registry = HospitalRegistry::new(vec![sample("A", 1.0)]).unwrap();

        assert_eq!(registry.decrement_bed("A", WardType::Icu).unwrap(), 0);
        let err = registry.decrement_bed("A", WardType::Icu).unwrap_err();
        assert!(matches!(err, DispatchError::BedsExhausted { ward: WardType::Icu, .. }));
        assert_eq!(registry.get("A").unwrap().icu_beds, 0);

        assert!(registry.decrement_bed("A", WardType::Op).is_err());
        assert_eq!(registry.get("A").unwrap().op_beds, 0);
    }

    #[test]
    fn test_new_rejects_duplicates_and_bad_distance() {
        assert!(HospitalRegistry::new(vec![sample("A", 1.0), sample("A", 2.0)]).is_err());
        assert!(HospitalRegistry::new(vec![sample(" ", 1.0)]).is_err());
        assert!(HospitalRegistry::new(vec![sample("A", -1.0)]).is_err());
        assert!(HospitalRegistry::new(vec![sample("A", f64::NAN)]).is_err());
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "- name: Harbor Hospital\n  specialty: Burns\n  distance_km: 7.5\n  icu_beds: 3\n  op_beds: 4\n  lat: 37.8\n  lon: -122.3"
        )
        .unwrap();

        let registry = HospitalRegistry::from_yaml_file(file.path()).unwrap();
        let harbor = registry.get("Harbor Hospital").unwrap();
        assert_eq!(harbor.icu_beds, 3);
        assert_eq!(harbor.distance_km, 7.5);
    }

    #[test]
    fn test_from_yaml_rejects_bed_totals_beyond_u32() {
        let yaml = "- name: A\n  specialty: x\n  distance_km: 1\n  icu_beds: 4294967295\n  op_beds: 0\n  lat: 0\n  lon: 0\n\
                    - name: B\n  specialty: x\n  distance_km: 2\n  icu_beds: 1\n  op_beds: 0\n  lat: 0\n  lon: 0";
        assert!(matches!(
            HospitalRegistry::from_yaml_str(yaml),
            Err(DispatchError::InvalidInput(_))
        ));

        let mut single = sample("A", 1.0);
        single.icu_beds = u32::MAX;
        let registry = HospitalRegistry::new(vec![single]).unwrap();
        assert_eq!(registry.census().icu_beds, u32::MAX);
    }

    #[test]
    fn test_from_yaml_rejects_negative_beds() {
        let yaml = "- name: A\n  specialty: x\n  distance_km: 1\n  icu_beds: -1\n  op_beds: 0\n  lat: 0\n  lon: 0";
        assert!(matches!(
            HospitalRegistry::from_yaml_str(yaml),
            Err(DispatchError::RegistryFileParse(_))
        ));
    }
}

//! Hospital matching and bed allocation.

use resq_types::WardType;

use crate::error::{DispatchError, DispatchResult};
use crate::hospital::{Hospital, HospitalRegistry};
use crate::mission::Mission;

/// Hospitals with at least one free bed of `ward`, nearest first.
///
/// The sort is stable, so equally distant hospitals keep registry order. An empty result means
/// the network has no capacity for this ward.
pub fn find_candidates(registry: &HospitalRegistry, ward: WardType) -> Vec<&Hospital> {
    let mut eligible: Vec<&Hospital> = registry
        .list_all()
        .iter()
        .filter(|h| h.beds(ward) > 0)
        .collect();
    eligible.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    eligible
}

/// Commits one bed at the mission's target for the assessed ward.
///
/// # Returns
/// The beds left in that ward.
///
/// # Errors
///
/// `IncompleteMission` when the mission has no target or assessment, otherwise whatever
/// [`HospitalRegistry::decrement_bed`] reports. The registry is untouched on error.
pub fn authorize(registry: &mut HospitalRegistry, mission: &Mission) -> DispatchResult<u32> {
    let target = mission
        .target_hospital
        .as_deref()
        .ok_or(DispatchError::IncompleteMission("target hospital"))?;
    let assessment = mission
        .assessment
        .as_ref()
        .ok_or(DispatchError::IncompleteMission("assessment"))?;

    registry.decrement_bed(target, assessment.ward_need)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::AssessmentResult;
    use resq_types::{NonEmptyText, Severity};

    fn hospital(name: &str, distance_km: f64, icu_beds: u32, op_beds: u32) -> Hospital {
        Hospital {
            name: name.into(),
            specialty: "General Care".into(),
            distance_km,
            icu_beds,
            op_beds,
            lat: 0.0,
            lon: 0.0,
        }
    }

    fn names(hospitals: &[&Hospital]) -> Vec<String> {
        hospitals.iter().map(|h| h.name.clone()).collect()
    }

    #[test]
    fn test_find_candidates_filters_and_sorts_by_distance() {
        let registry = HospitalRegistry::demo_network();

        let icu = find_candidates(&registry, WardType::Icu);
        assert_eq!(names(&icu), vec!["City General Trauma", "Metropolitan Heart"]);

        let op = find_candidates(&registry, WardType::Op);
        assert_eq!(
            names(&op),
            vec!["Suburban Clinic", "City General Trauma", "Metropolitan Heart"]
        );
        assert!(op.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[test]
    fn test_find_candidates_ties_keep_registry_order() {
        let registry = HospitalRegistry::new(vec![
            hospital("Far", 9.0, 1, 1),
            hospital("Second", 4.0, 1, 1),
            hospital("First", 4.0, 1, 1),
        ])
        .unwrap();
        assert_eq!(
            names(&find_candidates(&registry, WardType::Icu)),
            vec!["Second", "First", "Far"]
        );
    }

    #[test]
    fn test_find_candidates_empty_when_no_capacity() {
        let registry = HospitalRegistry::new(vec![hospital("A", 1.0, 0, 3)]).unwrap();
        assert!(find_candidates(&registry, WardType::Icu).is_empty());
    }

    #[test]
    fn test_authorize_decrements_assessed_ward_only() {
        let mut registry = HospitalRegistry::new(vec![hospital("B", 10.0, 2, 4)]).unwrap();
        let mission = Mission {
            target_hospital: Some("B".into()),
            assessment: Some(AssessmentResult {
                severity: Severity::new(8).unwrap(),
                ward_need: WardType::Icu,
                reason: NonEmptyText::new("Polytrauma").unwrap(),
            }),
            ..Mission::default()
        };

        assert_eq!(authorize(&mut registry, &mission).unwrap(), 1);
        let b = registry.get("B").unwrap();
        assert_eq!((b.icu_beds, b.op_beds), (1, 4));
    }

    #[test]
    fn test_authorize_requires_target_and_assessment() {
        let mut registry = HospitalRegistry::demo_network();
        let before = registry.clone();
        assert!(matches!(
            authorize(&mut registry, &Mission::default()),
            Err(DispatchError::IncompleteMission("target hospital"))
        ));
        assert_eq!(registry, before);
    }
}

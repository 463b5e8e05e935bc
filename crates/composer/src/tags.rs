//! Metadata propagation

use crate::planner::DeploymentPlan;
use crate::types::TagSet;

/// Apply every tag in `tags` to every unit of `plan`, in plan order
///
/// Returns the updated plan. Existing keys are overwritten, so applying the
/// same set again leaves the metadata unchanged.
pub fn apply_tags(plan: DeploymentPlan, tags: &TagSet) -> DeploymentPlan {
    let units = plan
        .into_units()
        .into_iter()
        .map(|mut unit| {
            for (key, value) in tags.iter() {
                unit.metadata.insert(key.to_string(), value.to_string());
            }
            log::debug!("Tagged {} with {} tags", unit.name, tags.len());
            unit
        })
        .collect();

    DeploymentPlan::from_units(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::compute_order;
    use crate::registry::UnitRegistry;
    use crate::types::UnitSpec;

    fn three_unit_plan() -> DeploymentPlan {
        let mut registry = UnitRegistry::new();
        registry.register(UnitSpec::new("ingestion")).unwrap();
        registry
            .register(UnitSpec::new("analytics").depends_on("ingestion"))
            .unwrap();
        registry
            .register(UnitSpec::new("dashboard").depends_on("analytics"))
            .unwrap();
        compute_order(&registry).unwrap()
    }

    #[test]
    fn test_every_unit_tagged() {
        let tags = TagSet::new()
            .with("Project", "X")
            .with("Environment", "Production");
        let plan = apply_tags(three_unit_plan(), &tags);

        assert_eq!(plan.len(), 3);
        for unit in plan.units() {
            assert_eq!(unit.metadata.get("Project").map(String::as_str), Some("X"));
            assert_eq!(
                unit.metadata.get("Environment").map(String::as_str),
                Some("Production")
            );
        }
    }

    #[test]
    fn test_idempotent() {
        let tags = TagSet::new().with("Project", "X").with("Owner", "Team");
        let once = apply_tags(three_unit_plan(), &tags);
        let twice = apply_tags(once.clone(), &tags);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_preserves_order() {
        let tags = TagSet::new().with("Project", "X");
        let plan = apply_tags(three_unit_plan(), &tags);
        assert_eq!(plan.names(), vec!["ingestion", "analytics", "dashboard"]);
    }

    #[test]
    fn test_last_write_wins() {
        let plan = apply_tags(three_unit_plan(), &TagSet::new().with("Environment", "Staging"));
        let plan = apply_tags(plan, &TagSet::new().with("Environment", "Production"));
        for unit in plan.units() {
            assert_eq!(unit.metadata.len(), 1);
            assert_eq!(unit.metadata["Environment"], "Production");
        }
    }

    #[test]
    fn test_empty_tag_set() {
        let plan = apply_tags(three_unit_plan(), &TagSet::new());
        assert!(plan.units().iter().all(|u| u.metadata.is_empty()));
    }
}

//! Dependency orderer - turns the registry into a deployment plan

use crate::error::{ConfigurationError, Result};
use crate::registry::UnitRegistry;
use crate::types::Unit;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Units in deployment order
///
/// Every unit appears after all units it depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentPlan {
    units: Vec<Unit>,
}

impl DeploymentPlan {
    pub(crate) fn from_units(units: Vec<Unit>) -> Self {
        Self { units }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn into_units(self) -> Vec<Unit> {
        self.units
    }

    /// Unit names in plan order
    pub fn names(&self) -> Vec<&str> {
        self.units.iter().map(|u| u.name.as_str()).collect()
    }

    /// Position of a unit in the plan
    pub fn position(&self, name: &str) -> Option<usize> {
        self.units.iter().position(|u| u.name == name)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Visited,
}

/// Compute a deployment order for every registered unit
///
/// Among units whose dependencies are all placed, the one registered first
/// goes next, so the result is deterministic. Fails with
/// [`ConfigurationError::CyclicDependency`] if the graph has a cycle; no
/// partial plan is returned in that case.
pub fn compute_order(registry: &UnitRegistry) -> Result<DeploymentPlan> {
    let units = registry.units();
    let deps = dependency_indices(registry)?;

    if let Some(cycle) = find_cycle(&deps) {
        let cycle: Vec<String> = cycle.into_iter().map(|i| units[i].name.clone()).collect();
        log::debug!("Cycle detected: {}", cycle.join(" -> "));
        return Err(ConfigurationError::CyclicDependency { cycle });
    }

    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); units.len()];
    let mut remaining: Vec<usize> = Vec::with_capacity(units.len());
    for (index, unit_deps) in deps.iter().enumerate() {
        remaining.push(unit_deps.len());
        for &dep in unit_deps {
            dependents[dep].push(index);
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = remaining
        .iter()
        .enumerate()
        .filter(|(_, count)| **count == 0)
        .map(|(index, _)| Reverse(index))
        .collect();

    let mut order = Vec::with_capacity(units.len());
    while let Some(Reverse(index)) = ready.pop() {
        order.push(units[index].clone());
        for &dependent in &dependents[index] {
            remaining[dependent] -= 1;
            if remaining[dependent] == 0 {
                ready.push(Reverse(dependent));
            }
        }
    }

    if order.len() != units.len() {
        let cycle = remaining
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(index, _)| units[index].name.clone())
            .collect();
        return Err(ConfigurationError::CyclicDependency { cycle });
    }

    log::debug!(
        "Deployment order: {}",
        order
            .iter()
            .map(|u| u.name.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    );

    Ok(DeploymentPlan::from_units(order))
}

/// Resolve each unit's dependency names to registration indices
fn dependency_indices(registry: &UnitRegistry) -> Result<Vec<Vec<usize>>> {
    registry
        .units()
        .iter()
        .map(|unit| -> Result<Vec<usize>> {
            let mut indices = unit
                .dependencies
                .iter()
                .map(|dep| {
                    registry
                        .index_of(dep)
                        .ok_or_else(|| ConfigurationError::UnknownDependency {
                            unit: unit.name.clone(),
                            dependency: dep.clone(),
                        })
                })
                .collect::<Result<Vec<_>>>()?;
            indices.sort_unstable();
            indices.dedup();
            Ok(indices)
        })
        .collect()
}

/// Depth-first search for a cycle, returning its path (first node repeated
/// at the end) if one exists
fn find_cycle(deps: &[Vec<usize>]) -> Option<Vec<usize>> {
    fn visit(
        node: usize,
        deps: &[Vec<usize>],
        marks: &mut [Mark],
        path: &mut Vec<usize>,
    ) -> Option<Vec<usize>> {
        match marks[node] {
            Mark::Visited => return None,
            Mark::Visiting => {
                let start = path.iter().position(|&n| n == node).unwrap_or(0);
                let mut cycle = path[start..].to_vec();
                cycle.push(node);
                return Some(cycle);
            }
            Mark::Unvisited => {}
        }

        marks[node] = Mark::Visiting;
        path.push(node);

        for &dep in &deps[node] {
            if let Some(cycle) = visit(dep, deps, marks, path) {
                return Some(cycle);
            }
        }

        path.pop();
        marks[node] = Mark::Visited;
        None
    }

    let mut marks = vec![Mark::Unvisited; deps.len()];
    let mut path = Vec::new();

    (0..deps.len()).find_map(|node| visit(node, deps, &mut marks, &mut path))
}

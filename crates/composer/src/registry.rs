//! Unit registry - owns every unit of a planning run
//!
//! Units are kept in registration order. A unit may only reference units
//! that are already registered; ordering edges between two registered units
//! can be added later with [`UnitRegistry::add_dependency`].

use crate::error::{ConfigurationError, Result};
use crate::types::{OutputRef, OutputValue, Unit, UnitHandle, UnitSpec};
use std::collections::{BTreeMap, HashMap};

/// Registry of deployable units
#[derive(Debug, Default)]
pub struct UnitRegistry {
    units: Vec<Unit>,
    by_name: HashMap<String, usize>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit
    ///
    /// Fails when the name is blank, contains a path separator or `..`, is
    /// taken, or when a declared dependency or input
    /// producer is not registered yet.
    pub fn register(&mut self, spec: UnitSpec) -> Result<UnitHandle> {
        let UnitSpec {
            name,
            description,
            outputs,
            inputs,
            depends_on,
        } = spec;

        if !is_valid_name(&name) {
            return Err(ConfigurationError::InvalidUnitName { name });
        }
        if self.by_name.contains_key(&name) {
            return Err(ConfigurationError::DuplicateUnitName { name });
        }

        let mut dependencies: Vec<String> = Vec::new();

        for source in inputs.values() {
            let producer = self.lookup(&name, &source.unit)?;
            if !self.units[producer].outputs.contains_key(&source.output) {
                return Err(ConfigurationError::UnknownOutput {
                    unit: source.unit.clone(),
                    output: source.output.clone(),
                });
            }
            push_unique(&mut dependencies, &source.unit);
        }

        for dependency in &depends_on {
            self.lookup(&name, dependency)?;
            push_unique(&mut dependencies, dependency);
        }

        let index = self.units.len();
        log::debug!(
            "Registered unit {} ({} outputs, depends on [{}])",
            name,
            outputs.len(),
            dependencies.join(", ")
        );

        self.by_name.insert(name.clone(), index);
        self.units.push(Unit {
            name,
            description,
            outputs,
            inputs,
            dependencies,
            metadata: BTreeMap::new(),
        });

        Ok(UnitHandle(index))
    }

    /// Declare that `consumer` must be deployed after `producer`
    ///
    /// Both units must already be registered. Adding an existing edge is a
    /// no-op.
    pub fn add_dependency(&mut self, consumer: UnitHandle, producer: UnitHandle) -> Result<()> {
        let producer_name = self.unit(producer)?.name.clone();
        let consumer_unit = self.units.get_mut(consumer.0).ok_or_else(|| {
            ConfigurationError::UnknownDependency {
                unit: format!("#{}", consumer.0),
                dependency: producer_name.clone(),
            }
        })?;

        if push_unique(&mut consumer_unit.dependencies, &producer_name) {
            log::debug!("{} now depends on {}", consumer_unit.name, producer_name);
        }
        Ok(())
    }

    /// Outputs declared by a registered unit
    pub fn outputs_of(&self, handle: UnitHandle) -> Result<&BTreeMap<String, OutputValue>> {
        Ok(&self.unit(handle)?.outputs)
    }

    /// Reference a single named output of a registered unit
    pub fn output(&self, handle: UnitHandle, name: &str) -> Result<OutputRef> {
        let unit = self.unit(handle)?;
        let value = unit
            .outputs
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownOutput {
                unit: unit.name.clone(),
                output: name.to_string(),
            })?;

        Ok(OutputRef {
            unit: unit.name.clone(),
            output: name.to_string(),
            value: value.clone(),
        })
    }

    /// Get a registered unit by handle
    pub fn unit(&self, handle: UnitHandle) -> Result<&Unit> {
        self.units
            .get(handle.0)
            .ok_or_else(|| ConfigurationError::UnknownDependency {
                unit: "<registry>".to_string(),
                dependency: format!("#{}", handle.0),
            })
    }

    /// Find a unit's handle by name
    pub fn handle(&self, name: &str) -> Option<UnitHandle> {
        self.by_name.get(name).copied().map(UnitHandle)
    }

    /// Units in registration order
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Registration index of a unit name
    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn lookup(&self, unit: &str, dependency: &str) -> Result<usize> {
        self.by_name
            .get(dependency)
            .copied()
            .ok_or_else(|| ConfigurationError::UnknownDependency {
                unit: unit.to_string(),
                dependency: dependency.to_string(),
            })
    }
}

/// Unit names end up in file names, so they must not be blank or path-like
fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name != "."
        && !name.contains(['/', '\\'])
        && !name.contains("..")
}

/// Push `name` if absent; returns whether it was added
fn push_unique(names: &mut Vec<String>, name: &str) -> bool {
    if names.iter().any(|n| n == name) {
        return false;
    }
    names.push(name.to_string());
    true
}

//! Core types for stack composition

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Region used when none is configured
pub const DEFAULT_REGION: &str = "us-east-1";

/// Account and region every unit is deployed into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentParameters {
    pub account_id: String,
    pub region: String,
}

/// Per-unit metadata (tag key -> tag value)
pub type Metadata = BTreeMap<String, String>;

/// Opaque handle to a value a unit produces (a bucket, a function, an API)
///
/// The planner never looks inside it; it only carries it from producer
/// to consumer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OutputValue(String);

impl OutputValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A reference to one named output of a registered unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRef {
    /// Name of the producing unit
    pub unit: String,
    /// Output name on the producer
    pub output: String,
    /// The value the producer declared for that output
    pub value: OutputValue,
}

impl fmt::Display for OutputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.unit, self.output)
    }
}

/// Handle to a unit inside the registry that issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitHandle(pub(crate) usize);

/// A named deployable unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub name: String,
    pub description: Option<String>,
    /// Values this unit produces, by output name
    pub outputs: BTreeMap<String, OutputValue>,
    /// Values this unit consumes, by local input name
    pub inputs: BTreeMap<String, OutputRef>,
    /// Names of the units this one must be deployed after
    pub dependencies: Vec<String>,
    pub metadata: Metadata,
}

impl Unit {
    /// Check whether this unit declares a dependency on `name`
    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies.iter().any(|d| d == name)
    }
}

/// Declaration of a unit before it is registered
///
/// ```ignore
/// let spec = UnitSpec::new("analytics")
///     .description("Analytics infrastructure")
///     .input("dataBucket", bucket_ref)
///     .output("lambda", OutputValue::new("AnalyticsFunction"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct UnitSpec {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) outputs: BTreeMap<String, OutputValue>,
    pub(crate) inputs: BTreeMap<String, OutputRef>,
    pub(crate) depends_on: Vec<String>,
}

impl UnitSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declare an output this unit produces
    pub fn output(mut self, name: impl Into<String>, value: OutputValue) -> Self {
        self.outputs.insert(name.into(), value);
        self
    }

    /// Consume another unit's output; implies a dependency on that unit
    pub fn input(mut self, name: impl Into<String>, source: OutputRef) -> Self {
        self.inputs.insert(name.into(), source);
        self
    }

    /// Declare a dependency on a unit by name
    pub fn depends_on(mut self, unit: impl Into<String>) -> Self {
        self.depends_on.push(unit.into());
        self
    }
}

/// Fixed mapping of tag keys to values, applied uniformly to units
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(BTreeMap<String, String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of this set with `key` set to `value`
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Return a copy of this set overlaid with `other` (other wins per key)
    pub fn merged(mut self, other: &TagSet) -> Self {
        for (key, value) in other.iter() {
            self.0.insert(key.to_string(), value.to_string());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

//! Manifest synthesis - writes the tagged plan to an output directory
//!
//! Layout:
//! - `manifest.json`: parameters plus the stacks in deployment order
//! - `<Stack>.template.json`: one file per stack

use anyhow::{Context, Result};
use composer::{
    DeploymentParameters, DeploymentPlan, Metadata, OutputRef, OutputValue, Synthesizer, Unit,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest format version
pub const MANIFEST_VERSION: &str = "1.0.0";

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    version: &'static str,
    account: &'a str,
    region: &'a str,
    stacks: Vec<StackEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct StackEntry<'a> {
    name: &'a str,
    template: String,
    dependencies: &'a [String],
    tags: &'a Metadata,
}

#[derive(Debug, Serialize)]
struct Template<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    environment: String,
    tags: &'a Metadata,
    outputs: &'a BTreeMap<String, OutputValue>,
    inputs: &'a BTreeMap<String, OutputRef>,
}

/// What a synthesis run wrote
#[derive(Debug)]
pub struct SynthesisReport {
    pub out_dir: PathBuf,
    /// Files written, manifest first
    pub files: Vec<PathBuf>,
}

/// Writes the plan as JSON files into a directory
pub struct ManifestSynthesizer {
    out_dir: PathBuf,
}

impl ManifestSynthesizer {
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }

    fn write_json<T: Serialize>(&self, file_name: &str, value: &T) -> Result<PathBuf> {
        let path = self.out_dir.join(file_name);
        let content = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize {file_name}"))?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Write every template, then the manifest, recording each file as it
    /// lands
    fn write_all(
        &self,
        params: &DeploymentParameters,
        plan: &DeploymentPlan,
        files: &mut Vec<PathBuf>,
    ) -> Result<()> {
        let environment = format!("aws://{}/{}", params.account_id, params.region);
        let mut stacks = Vec::with_capacity(plan.len());

        for unit in plan.units() {
            let template_file = template_file_name(unit);
            let template = Template {
                description: unit.description.as_deref(),
                environment: environment.clone(),
                tags: &unit.metadata,
                outputs: &unit.outputs,
                inputs: &unit.inputs,
            };
            files.push(self.write_json(&template_file, &template)?);

            stacks.push(StackEntry {
                name: &unit.name,
                template: template_file,
                dependencies: &unit.dependencies,
                tags: &unit.metadata,
            });
        }

        let manifest = Manifest {
            version: MANIFEST_VERSION,
            account: &params.account_id,
            region: &params.region,
            stacks,
        };
        files.insert(0, self.write_json(MANIFEST_FILE, &manifest)?);
        Ok(())
    }
}

impl Synthesizer for ManifestSynthesizer {
    type Output = SynthesisReport;

    fn synthesize(
        &mut self,
        params: &DeploymentParameters,
        plan: &DeploymentPlan,
    ) -> Result<SynthesisReport> {
        fs::create_dir_all(&self.out_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                self.out_dir.display()
            )
        })?;

        // A manifest from an earlier run must not describe this run's templates
        let manifest_path = self.out_dir.join(MANIFEST_FILE);
        if manifest_path.exists() {
            fs::remove_file(&manifest_path).with_context(|| {
                format!("Failed to remove stale {}", manifest_path.display())
            })?;
        }

        let mut files = Vec::with_capacity(plan.len() + 1);
        if let Err(err) = self.write_all(params, plan, &mut files) {
            discard(&files);
            return Err(err);
        }

        log::info!(
            "Synthesized {} stacks into {}",
            plan.len(),
            self.out_dir.display()
        );

        Ok(SynthesisReport {
            out_dir: self.out_dir.clone(),
            files,
        })
    }
}

/// Remove files written by a synthesis that did not finish
fn discard(files: &[PathBuf]) {
    for file in files {
        if let Err(err) = fs::remove_file(file) {
            log::warn!("Failed to remove partial output {}: {err}", file.display());
        }
    }
}

fn template_file_name(unit: &Unit) -> String {
    format!("{}.template.json", unit.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app;
    use composer::{UnitRegistry, apply_tags, compute_order};
    use serde_json::Value;
    use tempfile::TempDir;

    fn params() -> DeploymentParameters {
        DeploymentParameters {
            account_id: "123456789012".to_string(),
            region: "eu-central-1".to_string(),
        }
    }

    fn tagged_plan() -> DeploymentPlan {
        let mut registry = UnitRegistry::new();
        app::register_stacks(&mut registry, &params()).unwrap();
        apply_tags(compute_order(&registry).unwrap(), &app::tags())
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_writes_manifest_in_plan_order() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("cdk.out");
        let mut synth = ManifestSynthesizer::new(&out);

        let report = synth.synthesize(&params(), &tagged_plan()).unwrap();
        assert_eq!(report.files.len(), 4);
        assert_eq!(report.files[0], out.join(MANIFEST_FILE));

        let manifest = read_json(&out.join(MANIFEST_FILE));
        assert_eq!(manifest["version"], MANIFEST_VERSION);
        assert_eq!(manifest["account"], "123456789012");
        assert_eq!(manifest["region"], "eu-central-1");

        let names: Vec<&str> = manifest["stacks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                app::DATA_INGESTION_STACK,
                app::ANALYTICS_STACK,
                app::DASHBOARD_STACK
            ]
        );
        assert_eq!(
            manifest["stacks"][2]["dependencies"][0],
            app::ANALYTICS_STACK
        );
    }

    #[test]
    fn test_templates_carry_tags_and_inputs() {
        let dir = TempDir::new().unwrap();
        let mut synth = ManifestSynthesizer::new(dir.path());
        synth.synthesize(&params(), &tagged_plan()).unwrap();

        let template = read_json(
            &dir.path()
                .join(format!("{}.template.json", app::ANALYTICS_STACK)),
        );
        assert_eq!(template["environment"], "aws://123456789012/eu-central-1");
        assert_eq!(template["tags"]["Project"], "EcommerceSalesDashboard");
        assert_eq!(template["tags"]["Environment"], "Production");
        assert_eq!(
            template["inputs"]["dataBucket"]["unit"],
            app::DATA_INGESTION_STACK
        );
        assert_eq!(
            template["outputs"]["analyticsLambda"],
            "SalesAnalyticsFunction"
        );
    }

    #[test]
    fn test_unwritable_output_dir() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();

        let mut synth = ManifestSynthesizer::new(blocker.join("out"));
        assert!(synth.synthesize(&params(), &tagged_plan()).is_err());
    }

    #[test]
    fn test_failed_synthesis_leaves_no_manifest() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("cdk.out");
        fs::create_dir_all(&out).unwrap();
        fs::write(
            out.join(MANIFEST_FILE),
            r#"{"version":"1.0.0","stacks":[{"name":"OldStack"}]}"#,
        )
        .unwrap();
        // a directory where the last template belongs makes its write fail
        fs::create_dir(out.join(format!("{}.template.json", app::DASHBOARD_STACK))).unwrap();

        let mut synth = ManifestSynthesizer::new(&out);
        assert!(synth.synthesize(&params(), &tagged_plan()).is_err());

        assert!(!out.join(MANIFEST_FILE).exists());
        assert!(
            !out.join(format!("{}.template.json", app::DATA_INGESTION_STACK))
                .exists()
        );
        assert!(
            !out.join(format!("{}.template.json", app::ANALYTICS_STACK))
                .exists()
        );
    }

    #[test]
    fn test_rerun_replaces_manifest() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "{}").unwrap();

        let mut synth = ManifestSynthesizer::new(dir.path());
        synth.synthesize(&params(), &tagged_plan()).unwrap();

        let manifest = read_json(&dir.path().join(MANIFEST_FILE));
        assert_eq!(manifest["stacks"].as_array().unwrap().len(), 3);
    }
}

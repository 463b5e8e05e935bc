use colored::Colorize;
use composer::DeploymentPlan;

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print a step indicator
pub fn step(num: usize, total: usize, msg: &str) {
    println!("{} {}", format!("[{num}/{total}]").blue().bold(), msg);
}

// ============================================================================
// Plan Display
// ============================================================================

/// Display the ordered, tagged plan
pub fn display_plan(plan: &DeploymentPlan) {
    header("Deployment Plan");

    for (position, unit) in plan.units().iter().enumerate() {
        println!(
            "  {} {}",
            format!("{}.", position + 1).blue(),
            unit.name.bold()
        );

        if let Some(desc) = &unit.description {
            dim(&format!("   {desc}"));
        }

        if !unit.dependencies.is_empty() {
            dim(&format!("   after: {}", unit.dependencies.join(", ")));
        }

        for (input, source) in &unit.inputs {
            dim(&format!("   {input} ← {source}"));
        }

        if !unit.metadata.is_empty() {
            let tags: Vec<String> = unit
                .metadata
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            dim(&format!("   tags: {}", tags.join(", ")));
        }
    }
}

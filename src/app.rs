//! The e-commerce sales dashboard application
//!
//! Three stacks: ingestion feeds analytics, analytics feeds the dashboard.
//! The stacks' own resources live elsewhere; here they are only referenced
//! by output name.

use composer::{DeploymentParameters, OutputValue, TagSet, UnitRegistry, UnitSpec};

pub const DATA_INGESTION_STACK: &str = "EcommerceDataIngestionStack";
pub const ANALYTICS_STACK: &str = "EcommerceAnalyticsStack";
pub const DASHBOARD_STACK: &str = "EcommerceDashboardStack";

/// Tags applied to every stack
pub fn tags() -> TagSet {
    TagSet::new()
        .with("Project", "EcommerceSalesDashboard")
        .with("Environment", "Production")
        .with("Owner", "Development Team")
        .with("CostCenter", "Analytics")
}

/// Register the three stacks and wire their outputs together
pub fn register_stacks(
    registry: &mut UnitRegistry,
    params: &DeploymentParameters,
) -> composer::Result<()> {
    let ingestion = registry.register(
        UnitSpec::new(DATA_INGESTION_STACK)
            .description("Data ingestion infrastructure for e-commerce sales dashboard")
            .output(
                "dataBucket",
                OutputValue::new(format!(
                    "ecommerce-sales-data-{}-{}",
                    params.account_id, params.region
                )),
            )
            .output("deliveryStream", OutputValue::new("SalesDataFirehose"))
            .output("ingestionApi", OutputValue::new("SalesIngestionApi")),
    )?;

    let data_bucket = registry.output(ingestion, "dataBucket")?;
    let analytics = registry.register(
        UnitSpec::new(ANALYTICS_STACK)
            .description("Analytics infrastructure for e-commerce sales dashboard")
            .input("dataBucket", data_bucket)
            .output("analyticsLambda", OutputValue::new("SalesAnalyticsFunction"))
            .output("athenaWorkgroup", OutputValue::new("ecommerce-analytics")),
    )?;

    let analytics_lambda = registry.output(analytics, "analyticsLambda")?;
    let dashboard = registry.register(
        UnitSpec::new(DASHBOARD_STACK)
            .description("Dashboard infrastructure for e-commerce sales dashboard")
            .input("analyticsLambda", analytics_lambda)
            .output("dashboardApi", OutputValue::new("DashboardApi"))
            .output("distribution", OutputValue::new("DashboardDistribution")),
    )?;

    registry.add_dependency(analytics, ingestion)?;
    registry.add_dependency(dashboard, analytics)?;

    Ok(())
}

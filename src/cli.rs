use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stackplan")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(
    about = "Compose the e-commerce sales dashboard stacks and synthesize a deployment",
    long_about = "Registers the ingestion, analytics and dashboard stacks, orders them by \
                  dependency, applies the project tags and writes a deployment manifest.\n\n\
                  The account is read from CDK_DEFAULT_ACCOUNT (or ACCOUNT_ID) and is \
                  required. The region is read from CDK_DEFAULT_REGION (or REGION) and \
                  defaults to us-east-1."
)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,

    /// Directory the synthesized manifest is written to [default: cdk.out]
    #[arg(short, long, env = "CDK_OUTDIR")]
    pub output: Option<PathBuf>,

    /// Compute and print the plan without writing anything
    #[arg(
        long,
        env = "STACKPLAN_DRY_RUN",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub dry_run: bool,

    /// Optional TOML file with extra tags and an output directory
    #[arg(short, long, env = "STACKPLAN_CONFIG")]
    pub config: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::OsStr;

    #[test]
    fn test_cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_flags_needed() {
        let cli = Cli::try_parse_from(["stackplan"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_dry_run_env_accepts_numeric_flags() {
        // the env value goes through the same parser as the flag's value
        let cmd = Cli::command();
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id() == "dry_run")
            .unwrap();
        assert_eq!(arg.get_env(), Some(OsStr::new("STACKPLAN_DRY_RUN")));

        let parser = arg.get_value_parser();
        for value in ["1", "0", "true", "false", "yes", "off"] {
            assert!(
                parser.parse_ref(&cmd, Some(arg), OsStr::new(value)).is_ok(),
                "{value} should be accepted"
            );
        }
        assert!(
            parser
                .parse_ref(&cmd, Some(arg), OsStr::new("maybe"))
                .is_err()
        );
    }

    #[test]
    fn test_parse_flags() {
        let cli =
            Cli::try_parse_from(["stackplan", "-vv", "--dry-run", "-o", "out/dir"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.dry_run);
        assert_eq!(cli.output, Some(PathBuf::from("out/dir")));
    }
}

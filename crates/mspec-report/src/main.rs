//! Binary entrypoint: `mspec-report <run.json> [output-path]`
use anyhow::{Context, Result};
use clap::Parser;
use mspec_core::Run;
use mspec_report::{default_generator, GeneratorConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Output path used when neither the config file nor the command line names one
const DEFAULT_OUTPUT: &str = "reports/";

/// Writes HTML reports for a specification run.
///
/// Settings are layered: config file, then `MSPEC_REPORT_*` variables,
/// then the flags given here.
#[derive(Debug, Parser)]
#[command(name = "mspec-report", version, about = "Generate HTML specification reports")]
struct Cli {
    /// Run tree as JSON
    run: PathBuf,

    /// Directory (one report per assembly) or file (one combined report)
    output: Option<PathBuf>,

    /// YAML generator config
    #[arg(long, env = "MSPEC_REPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Include specification durations in the report
    #[arg(long)]
    timing: bool,

    /// Templates file replacing the bundled templates
    #[arg(long)]
    templates: Option<PathBuf>,
}

impl Cli {
    fn resolve_config<F>(&self, lookup: F) -> Result<GeneratorConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match &self.config {
            Some(path) => GeneratorConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => GeneratorConfig::new(DEFAULT_OUTPUT),
        };
        let mut config = config.apply_overrides(lookup)?;

        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if self.timing {
            config.include_timing_info = true;
        }
        if let Some(templates) = &self.templates {
            config.templates_path = Some(templates.clone());
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = cli.resolve_config(|key| std::env::var(key).ok())?;

    let file = std::fs::File::open(&cli.run)
        .with_context(|| format!("opening {}", cli.run.display()))?;
    let mut run = Run::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("reading run from {}", cli.run.display()))?;

    let generator = default_generator(&config)?;
    let outcome = generator
        .generate_report(&mut run)
        .with_context(|| format!("writing reports to {}", config.output_path.display()))?;

    for report in &outcome.reports {
        println!("{}", report.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mspec-report").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["run.json"]).resolve_config(no_env).unwrap();
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT));
        assert!(!config.include_timing_info);
        assert!(config.templates_path.is_none());
    }

    #[test]
    fn test_run_path_is_required() {
        assert!(Cli::try_parse_from(["mspec-report"]).is_err());
    }

    #[test]
    fn test_positional_output_overrides_config_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config_path = temp.path().join("mspec.yaml");
        std::fs::write(&config_path, "output_path: from-file/\ninclude_timing_info: true\n")
            .unwrap();
        let config_arg = config_path.display().to_string();

        let from_file = parse(&["run.json", "--config", &config_arg])
            .resolve_config(no_env)
            .unwrap();
        assert_eq!(from_file.output_path, PathBuf::from("from-file/"));
        assert!(from_file.include_timing_info);

        let overridden = parse(&["run.json", "cli.html", "--config", &config_arg])
            .resolve_config(no_env)
            .unwrap();
        assert_eq!(overridden.output_path, PathBuf::from("cli.html"));
        assert!(overridden.include_timing_info);
    }

    #[test]
    fn test_flags_override_environment() {
        let env: HashMap<&str, &str> = [
            ("MSPEC_REPORT_PATH", "env-out/"),
            ("MSPEC_REPORT_TEMPLATES", "env.yaml"),
        ]
        .into_iter()
        .collect();
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());

        let from_env = parse(&["run.json"]).resolve_config(lookup).unwrap();
        assert_eq!(from_env.output_path, PathBuf::from("env-out/"));
        assert_eq!(from_env.templates_path, Some(PathBuf::from("env.yaml")));

        let flagged = parse(&["run.json", "out.html", "--timing", "--templates", "cli.yaml"])
            .resolve_config(lookup)
            .unwrap();
        assert_eq!(flagged.output_path, PathBuf::from("out.html"));
        assert!(flagged.include_timing_info);
        assert_eq!(flagged.templates_path, Some(PathBuf::from("cli.yaml")));
    }

    #[test]
    fn test_missing_config_file() {
        let err = parse(&["run.json", "--config", "/nonexistent/mspec.yaml"])
            .resolve_config(no_env)
            .unwrap_err();
        assert!(err.to_string().contains("loading config"));
    }
}

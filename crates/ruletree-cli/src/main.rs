//! ruletree command-line interface
//!
//! Loads rule and data documents, evaluates a rule tree or an ad-hoc
//! expression, and prints the outcome.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ruletree_parser::RuleParser;
use ruletree_sdk::{Engine, EngineBuilder, EngineConfig, EvalOption};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Evaluate rule trees against data documents
#[derive(Parser)]
#[command(name = "ruletree", version, about = "Evaluate rule trees against data documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a registered rule tree and print the result tree as JSON
    Eval {
        /// Rule document (YAML or JSON)
        #[arg(long)]
        rules: PathBuf,
        /// Data document (YAML or JSON)
        #[arg(long)]
        data: PathBuf,
        /// Id of the root rule to evaluate
        #[arg(long)]
        rule: String,
        #[command(flatten)]
        options: EvalArgs,
        /// Engine configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Evaluate a numeric expression and print the number
    Calc {
        #[arg(long)]
        expr: String,
        /// Schema document declaring the expression's variables
        #[arg(long)]
        schema: PathBuf,
        #[arg(long)]
        data: PathBuf,
    },

    /// Compile a rule document and report what was registered
    Check {
        #[arg(long)]
        rules: PathBuf,
        /// Print the registered trees
        #[arg(long)]
        verbose: bool,
    },
}

/// Per-call evaluation options
#[derive(Args, Debug, Default)]
struct EvalArgs {
    #[arg(long)]
    max_depth: Option<usize>,
    /// Only keep failing children
    #[arg(long, conflicts_with = "only_passes")]
    only_failures: bool,
    /// Only keep passing children
    #[arg(long)]
    only_passes: bool,
    #[arg(long)]
    stop_first_positive: bool,
    #[arg(long)]
    stop_first_negative: bool,
    #[arg(long)]
    stop_if_parent_negative: bool,
}

impl EvalArgs {
    fn to_options(&self) -> Vec<EvalOption> {
        let mut options = Vec::new();
        if let Some(depth) = self.max_depth {
            options.push(EvalOption::MaxDepth(depth));
        }
        if self.only_failures {
            options.push(EvalOption::ReturnPass(false));
        }
        if self.only_passes {
            options.push(EvalOption::ReturnFail(false));
        }
        if self.stop_first_positive {
            options.push(EvalOption::StopFirstPositiveChild(true));
        }
        if self.stop_first_negative {
            options.push(EvalOption::StopFirstNegativeChild(true));
        }
        if self.stop_if_parent_negative {
            options.push(EvalOption::StopIfParentNegative(true));
        }
        options
    }
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Eval {
            rules,
            data,
            rule,
            options,
            config,
        } => {
            let output = run_eval(&rules, &data, &rule, &options, config.as_deref())?;
            println!("{}", output);
        }
        Commands::Calc { expr, schema, data } => {
            println!("{}", run_calc(&expr, &schema, &data)?);
        }
        Commands::Check { rules, verbose } => {
            let engine = load_engine(&rules, EngineConfig::default())?;
            println!("{} rule(s) compiled", engine.rule_count());
            if verbose {
                print!("{}", engine.describe());
            }
        }
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ruletree_cli=info,ruletree_sdk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}

fn load_engine(rules: &Path, config: EngineConfig) -> Result<Engine> {
    let engine = EngineBuilder::new()
        .with_config(config)
        .add_rule_file(rules)
        .build()
        .with_context(|| format!("Failed to load rules from {}", rules.display()))?;
    info!("Loaded {} rule(s) from {}", engine.rule_count(), rules.display());
    Ok(engine)
}

fn run_eval(
    rules: &Path,
    data: &Path,
    rule: &str,
    args: &EvalArgs,
    config: Option<&Path>,
) -> Result<String> {
    let config = match config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::load()?,
    };
    let engine = load_engine(rules, config)?;
    let mut data = RuleParser::parse_data_file(data)
        .with_context(|| format!("Failed to load data from {}", data.display()))?;

    let result = engine.evaluate(&mut data, rule, &args.to_options())?;
    Ok(serde_json::to_string_pretty(&result)?)
}

fn run_calc(expr: &str, schema: &Path, data: &Path) -> Result<f64> {
    let schema = RuleParser::parse_schema_file(schema)
        .with_context(|| format!("Failed to load schema from {}", schema.display()))?;
    let data = RuleParser::parse_data_file(data)
        .with_context(|| format!("Failed to load data from {}", data.display()))?;

    let mut engine = Engine::new();
    Ok(engine.calculate(&data, expr, &schema)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_eval_args_to_options() {
        let cli = Cli::try_parse_from([
            "ruletree",
            "eval",
            "--rules",
            "r.yaml",
            "--data",
            "d.yaml",
            "--rule",
            "root",
            "--max-depth",
            "2",
            "--only-failures",
            "--stop-first-negative",
        ])
        .unwrap();

        let Commands::Eval { options, rule, .. } = cli.command else {
            panic!("Expected eval command");
        };
        assert_eq!(rule, "root");
        assert_eq!(
            options.to_options(),
            vec![
                EvalOption::MaxDepth(2),
                EvalOption::ReturnPass(false),
                EvalOption::StopFirstNegativeChild(true),
            ]
        );
    }

    #[test]
    fn test_conflicting_filters_rejected() {
        let result = Cli::try_parse_from([
            "ruletree",
            "eval",
            "--rules",
            "r.yaml",
            "--data",
            "d.yaml",
            "--rule",
            "root",
            "--only-failures",
            "--only-passes",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_eval() {
        let rules = write_temp(
            ".yaml",
            r#"
rule:
  id: limits
  schema:
    id: s
    elements:
      - name: x
        type: { kind: int }
  rules:
    - id: positive
      expr: "x > 0"
    - id: huge
      expr: "x > 1000"
"#,
        );
        let data = write_temp(".json", r#"{"x": 5}"#);
        let config = write_temp(".yaml", "max_depth: 5\n");

        let args = EvalArgs {
            only_passes: true,
            ..Default::default()
        };
        let output = run_eval(
            rules.path(),
            data.path(),
            "limits",
            &args,
            Some(config.path()),
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["rule_id"], "limits");
        assert_eq!(json["pass"], true);
        assert_eq!(json["results"]["positive"]["pass"], true);
        assert!(json["results"].get("huge").is_none());
    }

    #[test]
    fn test_run_calc() {
        let schema = write_temp(
            ".yaml",
            "id: s\nelements:\n  - name: a\n    type: { kind: int }\n  - name: b\n    type: { kind: float }\n",
        );
        let data = write_temp(".yaml", "a: 2\nb: 0.5\n");
        assert_eq!(run_calc("a * b", schema.path(), data.path()).unwrap(), 1.0);
    }
}

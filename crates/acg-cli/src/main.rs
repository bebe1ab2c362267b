mod loader;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use acg_core::cache::{CacheMetadata, SpecCache, fingerprint};
use acg_core::config::{self, AcgConfig, CONFIG_FILE_NAME};
use acg_core::diff::{SpecDiff, diff};
use acg_core::error::AcgError;
use acg_core::reporter::{LogReporter, SilentReporter};
use acg_core::transform::{extract, index_by_operation_id};
use acg_core::validate::{ValidationReport, validate};
use acg_core::writer::TransactionalWriter;
use acg_core::{CodeGenerator, OperationDescriptor, Reporter, SpecDocument};
use acg_ts_client::{EmitConfig, TsClientGenerator};

use crate::loader::SpecSource;

#[derive(Parser)]
#[command(name = "acg", about = "Typed HTTP client generator for OpenAPI specs", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the TypeScript client from a spec
    Generate {
        /// Spec file (YAML or JSON) or http(s) URL
        #[arg(short, long)]
        input: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also rewrite the hand-editable client.ts and helpers.ts
        #[arg(long)]
        force: bool,

        /// Show what would change against the last run and write nothing
        #[arg(long)]
        dry_run: bool,

        /// Fail on validation warnings, not only errors
        #[arg(long)]
        strict: bool,

        /// Regenerate even if the spec is unchanged since the last run
        #[arg(long)]
        refresh: bool,
    },

    /// Lint a spec for structural problems
    Validate {
        /// Spec file (YAML or JSON) or http(s) URL
        #[arg(short, long)]
        input: Option<String>,

        /// Fail on validation warnings, not only errors
        #[arg(long)]
        strict: bool,
    },

    /// Compare the operations of two specs
    Diff {
        #[arg(long)]
        old: String,

        #[arg(long)]
        new: String,
    },

    /// Print the operations extracted from a spec
    Inspect {
        /// Spec file (YAML or JSON) or http(s) URL
        #[arg(short, long)]
        input: Option<String>,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new acg configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

struct GenerateArgs {
    input: Option<String>,
    output: Option<PathBuf>,
    force: bool,
    dry_run: bool,
    strict: bool,
    refresh: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            input,
            output,
            force,
            dry_run,
            strict,
            refresh,
        } => cmd_generate(GenerateArgs {
            input,
            output,
            force,
            dry_run,
            strict,
            refresh,
        }),

        Commands::Validate { input, strict } => cmd_validate(input, strict),

        Commands::Diff { old, new } => cmd_diff(&old, &new),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "acg", &mut std::io::stdout());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            if let Some(acg) = err.chain().find_map(|e| e.downcast_ref::<AcgError>()) {
                eprintln!("hint: {}", acg.hint());
            }
            ExitCode::FAILURE
        }
    }
}

/// Load the project config from the current directory, or the defaults.
fn load_project_config() -> Result<AcgConfig> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    Ok(config::load_config(&config_path)?.unwrap_or_default())
}

fn load_spec(input: &str, cfg: &AcgConfig, reporter: &dyn Reporter) -> Result<SpecDocument> {
    let source = SpecSource::parse(input);
    loader::load(&source, &cfg.fetch, reporter)
        .with_context(|| format!("failed to load spec from {source}"))
}

/// Print issues to stderr and turn them into a pass/fail verdict.
fn check(spec: &SpecDocument, strict: bool) -> Result<ValidationReport> {
    let report = ValidationReport::from(validate(spec));
    for issue in &report.issues {
        eprintln!("  {issue}");
    }
    Ok(report.into_result(strict)?)
}

fn print_diff(d: &SpecDiff) {
    for id in &d.added {
        println!("+ {id}");
    }
    for id in &d.removed {
        println!("- {id}");
    }
    for m in &d.modified {
        let fields: Vec<&str> = m.changes.iter().map(|c| c.as_str()).collect();
        println!("~ {} ({})", m.operation_id, fields.join(", "));
    }
    println!("{d}");
}

fn diff_specs(old: &[OperationDescriptor], new: &[OperationDescriptor]) -> SpecDiff {
    diff(&index_by_operation_id(old), &index_by_operation_id(new))
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let cfg = load_project_config()?;
    let input = args.input.unwrap_or_else(|| cfg.input.clone());
    let output = args.output.unwrap_or_else(|| PathBuf::from(&cfg.output));
    let reporter = LogReporter;

    let spec = load_spec(&input, &cfg, &reporter)?;
    check(&spec, args.strict || cfg.strict)?;

    let cache = SpecCache::new(&cfg.cache_dir);
    let hash = fingerprint(&spec);
    let operations = extract(&spec, &reporter);
    let lookup = cache.lookup(&hash, &reporter);
    let previous = lookup.previous.map(|prev| extract(&prev, &SilentReporter));

    if args.dry_run {
        match previous {
            Some(prev) => print_diff(&diff_specs(&prev, &operations)),
            None => println!(
                "no previous run cached; {} operations would be generated",
                operations.len()
            ),
        }
        return Ok(());
    }

    if lookup.unchanged && !args.force && !args.refresh && output.exists() {
        log::info!("spec unchanged since the last run, nothing to do (use --refresh to regenerate)");
        return Ok(());
    }

    if let Some(prev) = &previous {
        log::info!("changes since the last run: {}", diff_specs(prev, &operations));
    }

    let progress = reporter.progress("generate");
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let emit = EmitConfig {
        generated_at: timestamp.clone(),
        types_import: cfg.types_import.clone(),
        instance: cfg.instance.clone(),
        force: args.force,
    };
    let files = TsClientGenerator
        .generate(&operations, &emit)
        .map_err(|e| AcgError::Generation(e.to_string()))?;

    let mut writer = TransactionalWriter::new(&output).map_err(AcgError::from)?;
    writer.stage_all(&files).map_err(AcgError::from)?;
    let summary = writer.commit().map_err(AcgError::from)?;

    for path in &summary.written {
        eprintln!("  wrote {}", output.join(path).display());
    }
    for path in &summary.preserved {
        eprintln!(
            "  kept {} (hand-editable; pass --force to overwrite)",
            output.join(path).display()
        );
    }

    cache
        .store(
            &spec,
            &CacheMetadata {
                hash,
                timestamp,
                endpoint: input,
            },
        )
        .map_err(AcgError::from)?;

    progress.finish(&format!(
        "{} operations, {} files written to {}",
        operations.len(),
        summary.written.len(),
        output.display()
    ));
    Ok(())
}

fn cmd_validate(input: Option<String>, strict: bool) -> Result<()> {
    let cfg = load_project_config()?;
    let input = input.unwrap_or_else(|| cfg.input.clone());
    let reporter = LogReporter;
    let spec = load_spec(&input, &cfg, &reporter)?;

    let report = check(&spec, strict || cfg.strict)?;
    eprintln!(
        "Valid {} spec: {}",
        spec.version().unwrap_or("OpenAPI"),
        spec.title().unwrap_or("(untitled)")
    );
    eprintln!("  Operations: {}", extract(&spec, &reporter).len());
    eprintln!("  Warnings: {}", report.warnings().count());
    Ok(())
}

fn cmd_diff(old: &str, new: &str) -> Result<()> {
    let cfg = load_project_config()?;
    let reporter = LogReporter;
    let old_ops = extract(&load_spec(old, &cfg, &reporter)?, &reporter);
    let new_ops = extract(&load_spec(new, &cfg, &reporter)?, &reporter);
    print_diff(&diff_specs(&old_ops, &new_ops));
    Ok(())
}

fn cmd_inspect(input: Option<String>, format: InspectFormat) -> Result<()> {
    let cfg = load_project_config()?;
    let input = input.unwrap_or_else(|| cfg.input.clone());
    let reporter = LogReporter;
    let spec = load_spec(&input, &cfg, &reporter)?;
    let operations = extract(&spec, &reporter);

    let summary = serde_json::json!({
        "info": {
            "title": spec.title(),
            "version": spec.version(),
            "fingerprint": fingerprint(&spec),
        },
        "operations": operations,
    });

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::{info, info_span};

use recnorm_model::{ModuleConfig, RawConfig};
use recnorm_normalization::{DtypeRegistry, ModuleConfigBuilder};
use recnorm_xml::convert_bytes;

use recnorm_cli::records::{
    normalize_records, read_optional_map, read_records, records_to_json, sanitized_renames,
};

use crate::cli::{ConfigBuildArgs, ConfigCheckArgs, NormalizeArgs, SanitizeArgs, XmlArgs};
use crate::summary::{print_module_configs, print_sanitized};

pub fn run_xml(args: &XmlArgs) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("read {}", args.file.display()))?;
    let value = convert_bytes(&bytes).with_context(|| format!("convert {}", args.file.display()))?;
    print_json(&value.to_json(), args.compact)
}

pub fn run_sanitize(args: &SanitizeArgs) -> Result<()> {
    print_sanitized(&args.names);
    Ok(())
}

pub fn run_config_build(args: &ConfigBuildArgs) -> Result<()> {
    let span = info_span!("config_build", module = %args.module);
    let _guard = span.enter();

    let dtypes = read_optional_map(&args.dtypes)?;
    let renames = match &args.renames {
        Some(path) => read_optional_map(path)?,
        None => sanitized_renames(dtypes.keys()),
    };
    let built = ModuleConfigBuilder::build(&args.module, &renames, &dtypes);

    // The generated module must resolve before it is printed or written.
    let registry = DtypeRegistry::standard();
    ModuleConfigBuilder::new(&registry)
        .resolve(&built)
        .with_context(|| format!("resolve generated module {}", args.module))?;

    let Some(output) = &args.output else {
        println!("{}", built.to_json_pretty()?);
        return Ok(());
    };
    let mut config = if output.exists() {
        RawConfig::from_path(output)?
    } else {
        RawConfig::new()
    };
    config.merge(built);
    fs::write(output, config.to_json_pretty()?)
        .with_context(|| format!("write {}", output.display()))?;
    info!(
        path = %output.display(),
        modules = config.len(),
        "Wrote module configuration"
    );
    Ok(())
}

pub fn run_config_check(args: &ConfigCheckArgs) -> Result<()> {
    let registry = DtypeRegistry::standard();
    let modules = load_modules(&registry, &args.config)?;
    print_module_configs(&modules);
    Ok(())
}

pub fn run_normalize(args: &NormalizeArgs) -> Result<()> {
    let span = info_span!("normalize", module = %args.module);
    let _guard = span.enter();

    let registry = DtypeRegistry::standard();
    let mut modules = load_modules(&registry, &args.config)?;
    let config: ModuleConfig = modules.remove(&args.module).ok_or_else(|| {
        anyhow!(
            "module '{}' not found in {}",
            args.module,
            args.config.display()
        )
    })?;
    let records = read_records(&args.records)?;
    let normalized = normalize_records(&registry, &config, &records, args.keep_unconfigured)?;
    info!(records = normalized.len(), "Normalized records");
    print_json(&records_to_json(&normalized), args.compact)
}

fn load_modules(
    registry: &DtypeRegistry,
    path: &Path,
) -> Result<BTreeMap<String, ModuleConfig>> {
    let raw = RawConfig::from_path(path)?;
    ModuleConfigBuilder::new(registry)
        .resolve(&raw)
        .with_context(|| format!("resolve {}", path.display()))
}

fn print_json(value: &Value, compact: bool) -> Result<()> {
    let text = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .context("serialize JSON")?;
    println!("{text}");
    Ok(())
}

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::codegen::Generator;
use crate::codegen::helpers::HelperRegistry;
use crate::codegen::import_script::import_script;
use crate::config::ConvertOptions;
use crate::output;
use crate::provider::{SnapshotSource, StackSource};
use crate::stack::Stack;

/// Generate Terraform source and an import script from a stack snapshot
#[derive(Debug, Args)]
pub struct ConvertCommand {
    /// Stack name
    #[arg(short, long)]
    stack: Option<String>,

    /// Service name used in resource tags (defaults to the stack name)
    #[arg(long)]
    service: Option<String>,

    /// AWS region the stack was discovered in
    #[arg(long)]
    region: Option<String>,

    /// Stack snapshot file produced by a discovery run
    #[arg(long)]
    snapshot: PathBuf,

    /// Output directory for generated files
    #[arg(short, long, default_value = "./terraform")]
    output: PathBuf,

    /// JSON config file; replaces the stack/service/region/tag flags
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Additional tag rendered into every resource (repeatable)
    #[arg(long = "tag", value_name = "KEY=VALUE")]
    tags: Vec<String>,

    /// Skip running `terraform fmt` on the generated files
    #[arg(long)]
    skip_fmt: bool,
}

impl ConvertCommand {
    pub fn execute(self) -> Result<()> {
        let options = self.options()?;

        output::info(&format!("Converting stack '{}'", options.stack_name));

        let resources = SnapshotSource::new(&self.snapshot).load()?;
        let stack = Stack::new(&options, resources);

        let generator = Generator::new(HelperRegistry::standard())?;
        let artifacts = generator.render(&stack)?;
        let script = import_script(&stack.all_resources());

        write_outputs(&self.output, &artifacts, &script)?;

        if !self.skip_fmt {
            terraform_fmt(&self.output);
        }

        output::success(&format!(
            "Generated {} Terraform file(s) and import.sh in {}",
            artifacts.len(),
            self.output.display()
        ));
        Ok(())
    }

    fn options(&self) -> Result<ConvertOptions> {
        if let Some(config_path) = &self.config {
            return ConvertOptions::from_file(config_path);
        }

        let Some(stack_name) = self.stack.clone() else {
            bail!("either --stack or --config is required");
        };

        let mut additional_tags = BTreeMap::new();
        for tag in &self.tags {
            let Some((key, value)) = tag.split_once('=') else {
                bail!("invalid --tag '{}', expected KEY=VALUE", tag);
            };
            additional_tags.insert(key.to_string(), value.to_string());
        }

        Ok(ConvertOptions {
            stack_name,
            service_name: self.service.clone().unwrap_or_default(),
            region: self.region.clone().unwrap_or_default(),
            additional_tags,
        }
        .normalized())
    }
}

/// Write all artifacts plus the import script. Nothing is written unless the
/// whole render already succeeded.
fn write_outputs(
    directory: &Path,
    artifacts: &BTreeMap<String, String>,
    script: &str,
) -> Result<()> {
    fs::create_dir_all(directory)
        .with_context(|| format!("unable to create output directory: {}", directory.display()))?;

    for (name, content) in artifacts {
        let path = directory.join(name);
        fs::write(&path, content).with_context(|| format!("unable to write {}", path.display()))?;
        output::key_value("Created", &path.display().to_string());
    }

    let script_path = directory.join("import.sh");
    fs::write(&script_path, script)
        .with_context(|| format!("unable to write {}", script_path.display()))?;
    output::key_value("Created", &script_path.display().to_string());

    Ok(())
}

/// Best-effort formatting pass. The generated files are already valid input
/// for a later manual `terraform fmt`, so a missing binary only warns.
fn terraform_fmt(directory: &Path) {
    match Command::new("terraform").arg("fmt").current_dir(directory).output() {
        Ok(result) if result.status.success() => {}
        Ok(result) => {
            let stderr = String::from_utf8_lossy(&result.stderr);
            output::warning(&format!("terraform fmt failed: {}", stderr.trim()));
        }
        Err(err) => {
            output::warning(&format!("unable to run terraform fmt: {}", err));
        }
    }
}

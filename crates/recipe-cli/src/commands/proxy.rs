//! `recipes proxy ...`: the edge container's entrypoint.

use std::io::Write;
use std::path::Path;

use recipe_config::RecipeConfig;
use recipe_proxy::{ExecHandoff, Launcher, RenderReport, process_environment};
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{ProxyCommands, RenderArgs, RunArgs};
use crate::output::output;

/// Handle `recipes proxy ...`.
pub fn handle(
    action: &ProxyCommands,
    config: &RecipeConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProxyCommands::Render(args) => render(args, config, flags),
        ProxyCommands::Run(args) => run(args, config),
    }
}

fn launcher(
    config: &RecipeConfig,
    template: Option<&Path>,
    output: Option<&Path>,
) -> Launcher {
    let mut launcher = Launcher::from_config(&config.proxy);
    if let Some(template) = template {
        launcher = launcher.with_template_path(template);
    }
    if let Some(output) = output {
        launcher = launcher.with_output_path(output);
    }
    launcher
}

fn report_json(report: &RenderReport) -> serde_json::Value {
    json!({
        "template": report.template_path.display().to_string(),
        "output": report.output_path.display().to_string(),
        "substituted": report.rendered.substituted,
        "missing": report.rendered.missing,
    })
}

fn render(args: &RenderArgs, config: &RecipeConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let env = process_environment();

    if args.output.as_deref() == Some(Path::new("-")) {
        let rendered = launcher(config, args.template.as_deref(), None).render(&env)?;
        for name in &rendered.missing {
            tracing::warn!(variable = %name, "variable not set");
        }
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(rendered.text.as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    let report = launcher(config, args.template.as_deref(), args.output.as_deref()).prepare(&env)?;
    output(&report_json(&report), flags.format)
}

/// Never returns `Ok`: on success the process image is the proxy.
fn run(args: &RunArgs, config: &RecipeConfig) -> anyhow::Result<()> {
    let env = process_environment();
    let launcher = launcher(config, args.template.as_deref(), args.output.as_deref());
    match launcher.run(&env, &ExecHandoff) {
        Ok(never) => match never {},
        Err(error) => Err(error.into()),
    }
}

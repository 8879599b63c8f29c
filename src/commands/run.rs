//! Run command implementation
//!
//! Brings the requested targets up to date:
//! 1. Layer the configuration and build the target graph
//! 2. Print the plan (what will run, what is already up to date)
//! 3. Execute it, stopping at the first failing command
//!
//! With `--dry-run` the plan, including every command line, is printed and
//! nothing is executed or removed.

use anyhow::Result;
use std::time::Instant;

use framework_provisioner::error::Error;
use framework_provisioner::orchestrator::{Action, PlanStep};
use framework_provisioner::output::{OutputConfig, Status};

use super::{ProvisionArgs, Workspace};

/// Execute the requested targets
pub fn execute(args: &ProvisionArgs, output: &OutputConfig) -> Result<()> {
    let start_time = Instant::now();
    let Workspace {
        work_dir,
        config,
        mut orchestrator,
    } = Workspace::load(args)?;

    let plan = orchestrator.plan(&args.targets)?;
    let rendered = render_plan(&plan, output, args.dry_run);
    let nothing_to_clean = plan
        .iter()
        .find(|step| step.action == Action::Missing)
        .map(artifact_label);

    if !args.quiet {
        println!(
            "{}",
            output.line(
                Status::Start,
                &format!(
                    "Python {} framework in {}{}",
                    config.python_version,
                    work_dir.display(),
                    if args.dry_run { " (dry run)" } else { "" }
                ),
            )
        );
        for line in &rendered {
            println!("{}", line);
        }
        println!();
    }

    if args.dry_run {
        // the real run would fail at the same step
        return match nothing_to_clean {
            Some(path) => Err(Error::ArtifactMissing { path }.into()),
            None => Ok(()),
        };
    }

    match orchestrator.run_all(&args.targets) {
        Ok(()) => {
            if !args.quiet {
                println!(
                    "{}",
                    output.line(
                        Status::Success,
                        &format!("Done in {:.2}s", start_time.elapsed().as_secs_f64()),
                    )
                );
            }
            Ok(())
        }
        Err(e) => {
            if !args.quiet {
                println!();
                println!("{}", output.line(Status::Failure, "Provisioning failed"));
            }
            Err(e.into())
        }
    }
}

/// One line per plan step; with `verbose`, each command line too.
fn render_plan(plan: &[PlanStep<'_>], output: &OutputConfig, verbose: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for step in plan {
        let name = output.target_name(&step.target.name);
        let message = match step.action {
            Action::Run => name,
            Action::UpToDate => format!("{} is up to date", name),
            Action::Remove => format!("remove {}", artifact_label(step)),
            Action::Missing => format!("nothing to remove at {}", artifact_label(step)),
        };
        lines.push(output.line(step.action.into(), &message));

        if verbose && step.action == Action::Run {
            for invocation in &step.target.commands {
                lines.push(format!("    {}", invocation));
            }
        }
    }
    lines
}

fn artifact_label(step: &PlanStep<'_>) -> String {
    step.target
        .artifact
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| step.target.name.clone())
}

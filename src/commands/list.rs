//! # List Command Implementation
//!
//! Prints the requested targets as a dependency tree. Each entry shows the
//! target's description and whether its artifact is already on disk, which
//! is what decides if a run will rebuild it.
//!
//! This is a read-only operation: nothing is cloned, built, or removed.

use anyhow::Result;
use ptree::{print_tree, TreeItem};

use framework_provisioner::orchestrator::Orchestrator;
use framework_provisioner::output::OutputConfig;
use framework_provisioner::target::Target;

use super::{ProvisionArgs, Workspace};

/// Execute the `--list` mode.
pub fn execute(args: &ProvisionArgs, output: &OutputConfig) -> Result<()> {
    let workspace = Workspace::load(args)?;
    let root = build_tree(&workspace.orchestrator, &args.targets, output)?;
    print_tree(&root).map_err(|e| anyhow::anyhow!("Failed to display targets: {}", e))?;
    Ok(())
}

fn build_tree(
    orchestrator: &Orchestrator,
    goals: &[String],
    output: &OutputConfig,
) -> Result<TreeNode> {
    let graph = orchestrator.graph();
    let mut children = Vec::with_capacity(goals.len());
    for goal in goals {
        if orchestrator.is_clean_goal(goal) {
            let removes = graph
                .clean_target()
                .and_then(|t| t.artifact.as_ref())
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            children.push(TreeNode::leaf(format!(
                "{} - Remove {} (always runs)",
                output.target_name(goal),
                removes
            )));
            continue;
        }
        let target = graph.lookup(goal)?;
        children.push(build_node(orchestrator, target, output));
    }

    Ok(TreeNode {
        label: "Targets".to_string(),
        children,
    })
}

fn build_node(orchestrator: &Orchestrator, target: &Target, output: &OutputConfig) -> TreeNode {
    let children = target
        .dependencies
        .iter()
        .filter_map(|dep| orchestrator.graph().get(dep))
        .map(|dep| build_node(orchestrator, dep, output))
        .collect();
    TreeNode {
        label: label_for(target, orchestrator.is_up_to_date(&target.name), output),
        children,
    }
}

fn label_for(target: &Target, present: bool, output: &OutputConfig) -> String {
    let status = match (&target.artifact, present) {
        (None, _) => "(phony)".to_string(),
        (Some(path), true) => format!("[present: {}]", path.display()),
        (Some(path), false) => format!("[missing: {}]", path.display()),
    };
    if target.description.is_empty() {
        format!("{} {}", output.target_name(&target.name), status)
    } else {
        format!(
            "{} - {} {}",
            output.target_name(&target.name),
            target.description,
            status
        )
    }
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(label: String) -> Self {
        Self {
            label,
            children: vec![],
        }
    }
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: std::io::Write>(
        &self,
        f: &mut W,
        _style: &ptree::Style,
    ) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> std::borrow::Cow<'_, [Self::Child]> {
        std::borrow::Cow::Borrowed(&self.children)
    }
}

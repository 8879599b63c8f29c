//! # Provisioning Orchestrator
//!
//! The orchestrator walks a [`TargetGraph`] on behalf of the operator. For a
//! requested goal it:
//!
//! 1.  Checks the target's artifact. If it is present the target is
//!     satisfied and neither its commands nor its dependencies run.
//! 2.  Otherwise resolves each dependency, depth-first, in declaration order.
//!     A dependency is resolved at most once per run.
//! 3.  Runs the target's own commands in order. The first failing command
//!     aborts the whole run; nothing is retried and nothing is rolled back.
//!
//! Phony targets (no artifact) skip step 1 and always run.
//!
//! Commands and artifact checks go through the injected [`CommandRunner`]
//! and [`ArtifactStore`], so every decision can be tested without touching
//! the filesystem or spawning processes.
//!
//! ## Target states
//!
//! ```text
//! Unstarted --(dependencies satisfied)--> Running --> Satisfied
//!                                                 \-> Failed
//! ```
//!
//! A target whose dependency fails stays `Unstarted`.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::artifacts::ArtifactStore;
use crate::defaults;
use crate::error::{Error, Result};
use crate::runner::CommandRunner;
use crate::target::{Target, TargetGraph};

/// Lifecycle of one target within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetState {
    Unstarted,
    Running,
    Satisfied,
    Failed,
}

impl TargetState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetState::Unstarted => "unstarted",
            TargetState::Running => "running",
            TargetState::Satisfied => "satisfied",
            TargetState::Failed => "failed",
        }
    }

    /// Whether the state is terminal for the current run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TargetState::Satisfied | TargetState::Failed)
    }
}

/// What a run would do with one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Run the target's commands.
    Run,
    /// Artifact present; nothing to do.
    UpToDate,
    /// Remove the target's artifact (the `clean` goal).
    Remove,
    /// `clean` with nothing to remove; a run fails at this step.
    Missing,
}

/// One step of a [`Orchestrator::plan`].
#[derive(Debug, Clone, Copy)]
pub struct PlanStep<'a> {
    pub target: &'a Target,
    pub action: Action,
}

/// Executes provisioning goals against a target graph.
pub struct Orchestrator {
    graph: TargetGraph,
    runner: Box<dyn CommandRunner>,
    artifacts: Box<dyn ArtifactStore>,
    states: HashMap<String, TargetState>,
}

impl Orchestrator {
    pub fn new(
        graph: TargetGraph,
        runner: Box<dyn CommandRunner>,
        artifacts: Box<dyn ArtifactStore>,
    ) -> Self {
        Self {
            graph,
            runner,
            artifacts,
            states: HashMap::new(),
        }
    }

    pub fn graph(&self) -> &TargetGraph {
        &self.graph
    }

    /// State of `name` in the most recent run.
    pub fn state(&self, name: &str) -> TargetState {
        self.states
            .get(name)
            .copied()
            .unwrap_or(TargetState::Unstarted)
    }

    /// Bring `target` and its dependencies up to date.
    pub fn run(&mut self, target: &str) -> Result<()> {
        self.run_all(&[target])
    }

    /// Run several goals in one run, sharing per-target state.
    ///
    /// `clean` is accepted as a goal and removes the build artifact at that
    /// point in the sequence. Every name is checked before anything runs.
    pub fn run_all<S: AsRef<str>>(&mut self, goals: &[S]) -> Result<()> {
        self.validate_goals(goals)?;
        self.states.clear();

        for goal in goals {
            let goal = goal.as_ref();
            if self.is_clean_goal(goal) {
                self.clean()?;
            } else {
                let mut visiting = HashSet::new();
                self.resolve(goal, &mut visiting)?;
            }
        }
        Ok(())
    }

    /// Remove the build artifact unconditionally.
    ///
    /// Fails when the artifact is absent or cannot be removed. Other
    /// artifacts, such as the builder checkout, are left alone.
    pub fn clean(&mut self) -> Result<()> {
        let (name, path) = self.clean_artifact()?;
        info!("removing {}", path.display());
        self.artifacts.remove(&path)?;
        self.states.insert(name, TargetState::Unstarted);
        Ok(())
    }

    /// The steps a run of `goals` would take, judged against the artifacts
    /// present now. Runs nothing.
    ///
    /// A `clean` with nothing to remove is planned as [`Action::Missing`]
    /// and ends the plan, since the run stops there too.
    pub fn plan<S: AsRef<str>>(&self, goals: &[S]) -> Result<Vec<PlanStep<'_>>> {
        self.validate_goals(goals)?;

        let mut planner = Planner {
            graph: &self.graph,
            artifacts: self.artifacts.as_ref(),
            overrides: HashMap::new(),
            visited: HashSet::new(),
            steps: Vec::new(),
        };

        for goal in goals {
            let goal = goal.as_ref();
            if self.is_clean_goal(goal) {
                let target = self.clean_target()?;
                let present = target
                    .artifact
                    .as_deref()
                    .is_some_and(|path| planner.exists(path));
                if !present {
                    planner.steps.push(PlanStep {
                        target,
                        action: Action::Missing,
                    });
                    break;
                }
                if let Some(path) = &target.artifact {
                    planner.overrides.insert(path.clone(), false);
                }
                planner.visited.remove(target.name.as_str());
                planner.steps.push(PlanStep {
                    target,
                    action: Action::Remove,
                });
            } else {
                planner.visit(goal);
            }
        }

        Ok(planner.steps)
    }

    /// Whether the artifact of `name` is present. Phony targets never are.
    pub fn is_up_to_date(&self, name: &str) -> bool {
        self.graph
            .artifact_of(name)
            .is_some_and(|path| self.artifacts.exists(path))
    }

    /// Whether `goal` is the `clean` pseudo-target rather than a declared one.
    pub fn is_clean_goal(&self, goal: &str) -> bool {
        goal == defaults::CLEAN_TARGET && !self.graph.contains(goal)
    }

    fn validate_goals<S: AsRef<str>>(&self, goals: &[S]) -> Result<()> {
        for goal in goals {
            let goal = goal.as_ref();
            if self.is_clean_goal(goal) {
                self.clean_target()?;
            } else {
                self.graph.lookup(goal)?;
            }
        }
        Ok(())
    }

    fn clean_target(&self) -> Result<&Target> {
        self.graph
            .clean_target()
            .ok_or_else(|| Error::InvalidCleanTarget {
                reason: "no target is marked for clean".to_string(),
            })
    }

    fn clean_artifact(&self) -> Result<(String, PathBuf)> {
        let target = self.clean_target()?;
        let path = target.artifact.clone().ok_or_else(|| Error::ArtifactMissing {
            path: target.name.clone(),
        })?;
        Ok((target.name.clone(), path))
    }

    fn resolve(&mut self, name: &str, visiting: &mut HashSet<String>) -> Result<()> {
        match self.state(name) {
            TargetState::Satisfied => return Ok(()),
            TargetState::Failed | TargetState::Running => {
                // a failure aborts the run, so neither state is seen again
                return Err(Error::CycleDetected {
                    cycle: name.to_string(),
                });
            }
            TargetState::Unstarted => {}
        }
        if !visiting.insert(name.to_string()) {
            return Err(Error::CycleDetected {
                cycle: name.to_string(),
            });
        }

        let target = self.graph.lookup(name)?.clone();

        if let Some(path) = &target.artifact {
            if self.artifacts.exists(path) {
                info!("{} is up to date", target.name);
                self.states.insert(target.name.clone(), TargetState::Satisfied);
                return Ok(());
            }
        }

        for dependency in &target.dependencies {
            debug!("{} requires {}", target.name, dependency);
            self.resolve(dependency, visiting)?;
        }

        self.states.insert(target.name.clone(), TargetState::Running);
        info!("running {}", target.name);

        for invocation in &target.commands {
            debug!("{}: {}", target.name, invocation);
            let status = match self.runner.run(invocation) {
                Ok(status) => status,
                Err(e) => {
                    self.states.insert(target.name.clone(), TargetState::Failed);
                    return Err(e);
                }
            };

            if !status.is_success() {
                self.states.insert(target.name.clone(), TargetState::Failed);
                return Err(Error::CommandFailed {
                    command: invocation.to_string(),
                    code: status.code,
                    hint: self.failure_hint(&target),
                });
            }
        }

        if let Some(path) = &target.artifact {
            if !self.artifacts.exists(path) {
                warn!(
                    "{} finished but {} was not created; it will run again next time",
                    target.name,
                    path.display()
                );
            }
        }

        self.states.insert(target.name.clone(), TargetState::Satisfied);
        info!("{} done", target.name);
        Ok(())
    }

    /// Recovery advice for a failed target.
    ///
    /// A failure may leave a partial artifact behind, which the next run
    /// would treat as satisfied. Likewise a dependency artifact reused from
    /// an earlier run may be incomplete.
    fn failure_hint(&self, target: &Target) -> Option<String> {
        if let Some(path) = target.artifact.as_deref() {
            if self.artifacts.exists(path) {
                warn!("{} left a partial {}", target.name, path.display());
                return Some(format!(
                    "{} may be incomplete; remove it before re-running",
                    path.display()
                ));
            }
        }

        let reused: Vec<&Path> = target
            .dependencies
            .iter()
            .filter_map(|dependency| self.graph.artifact_of(dependency))
            .filter(|path| self.artifacts.exists(path))
            .collect();
        if reused.is_empty() {
            return None;
        }

        let listed: Vec<String> = reused.iter().map(|p| p.display().to_string()).collect();
        Some(format!(
            "if {} is stale or incomplete, remove it and re-run",
            listed.join(", ")
        ))
    }
}

/// Simulates a run for [`Orchestrator::plan`].
struct Planner<'a> {
    graph: &'a TargetGraph,
    artifacts: &'a dyn ArtifactStore,
    /// Artifact presence changed by earlier planned steps
    overrides: HashMap<PathBuf, bool>,
    visited: HashSet<&'a str>,
    steps: Vec<PlanStep<'a>>,
}

impl<'a> Planner<'a> {
    fn exists(&self, path: &Path) -> bool {
        self.overrides
            .get(path)
            .copied()
            .unwrap_or_else(|| self.artifacts.exists(path))
    }

    fn visit(&mut self, name: &str) {
        let Some(target) = self.graph.get(name) else {
            return;
        };
        if !self.visited.insert(target.name.as_str()) {
            return;
        }

        if let Some(path) = &target.artifact {
            if self.exists(path) {
                self.steps.push(PlanStep {
                    target,
                    action: Action::UpToDate,
                });
                return;
            }
        }

        for dependency in &target.dependencies {
            self.visit(dependency);
        }

        if let Some(path) = &target.artifact {
            self.overrides.insert(path.clone(), true);
        }
        self.steps.push(PlanStep {
            target,
            action: Action::Run,
        });
    }
}

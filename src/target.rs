//! # Targets and the Target Graph
//!
//! A [`Target`] is a named unit of provisioning work: an optional output
//! artifact, the targets it depends on, and the external commands that
//! produce the artifact. Targets are collected into a [`TargetGraph`], which
//! validates the declarations once, up front, so the orchestrator can walk
//! the graph without re-checking it.
//!
//! Validation rejects:
//! - two targets with the same name,
//! - a dependency on a name that was never declared,
//! - any dependency cycle.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A single external command: program, arguments, and environment overrides.
///
/// Only variables that are actually set appear in `env`; an unset option is
/// absent rather than present with an empty value. Names in `env_remove` are
/// stripped from the inherited environment before `env` is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub env_remove: BTreeSet<String>,
}

impl Invocation {
    /// Create an invocation of `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            env_remove: BTreeSet::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for this invocation only.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.env_remove.remove(&key);
        self.env.insert(key, value.into());
        self
    }

    /// Keep an inherited environment variable away from this invocation.
    pub fn env_clear_var(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.env.remove(&key);
        self.env_remove.insert(key);
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{}={} ", key, value)?;
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// A named unit of provisioning work.
#[derive(Debug, Clone)]
pub struct Target {
    pub name: String,
    /// One-line summary shown by `--list`
    pub description: String,
    /// Output whose presence marks the target satisfied. `None` means the
    /// target is phony and always runs.
    pub artifact: Option<PathBuf>,
    pub dependencies: Vec<String>,
    pub commands: Vec<Invocation>,
}

impl Target {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            artifact: None,
            dependencies: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn produces(mut self, artifact: impl Into<PathBuf>) -> Self {
        self.artifact = Some(artifact.into());
        self
    }

    pub fn depends_on(mut self, dependency: impl Into<String>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    pub fn command(mut self, invocation: Invocation) -> Self {
        self.commands.push(invocation);
        self
    }

    /// True when the target has no artifact and is never memoized.
    pub fn is_phony(&self) -> bool {
        self.artifact.is_none()
    }
}

/// A validated, declaration-ordered collection of targets.
#[derive(Debug, Clone)]
pub struct TargetGraph {
    targets: Vec<Target>,
    index: HashMap<String, usize>,
    clean_target: Option<String>,
}

impl TargetGraph {
    /// Build a graph from target declarations, rejecting duplicates,
    /// dangling dependencies, and cycles.
    pub fn new(targets: Vec<Target>) -> Result<Self> {
        let mut index = HashMap::new();
        for (position, target) in targets.iter().enumerate() {
            if index.insert(target.name.clone(), position).is_some() {
                return Err(Error::DuplicateTarget {
                    name: target.name.clone(),
                });
            }
        }

        for target in &targets {
            for dependency in &target.dependencies {
                if !index.contains_key(dependency) {
                    return Err(Error::UnknownDependency {
                        target: target.name.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }

        let graph = Self {
            targets,
            index,
            clean_target: None,
        };
        graph.check_acyclic()?;
        Ok(graph)
    }

    /// Mark the target whose artifact `clean` removes.
    pub fn with_clean_target(mut self, name: &str) -> Result<Self> {
        let target = self.lookup(name)?;
        if target.is_phony() {
            return Err(Error::InvalidCleanTarget {
                reason: format!("{} has no artifact to remove", name),
            });
        }
        self.clean_target = Some(name.to_string());
        Ok(self)
    }

    /// Look up a declared target by name.
    pub fn get(&self, name: &str) -> Option<&Target> {
        self.index.get(name).map(|&position| &self.targets[position])
    }

    /// Look up a declared target, producing an `UnknownTarget` error with a
    /// suggestion when the name is close to a declared one.
    pub fn lookup(&self, name: &str) -> Result<&Target> {
        self.get(name).ok_or_else(|| Error::UnknownTarget {
            name: name.to_string(),
            hint: self.suggest(name),
        })
    }

    /// The target whose artifact `clean` removes, if one was marked.
    pub fn clean_target(&self) -> Option<&Target> {
        self.clean_target.as_deref().and_then(|name| self.get(name))
    }

    /// All targets in declaration order.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Target names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|t| t.name.as_str())
    }

    /// Whether `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Artifact path declared by `name`, if any.
    pub fn artifact_of(&self, name: &str) -> Option<&Path> {
        self.get(name).and_then(|t| t.artifact.as_deref())
    }

    fn suggest(&self, name: &str) -> Option<String> {
        let lowered = name.to_lowercase();
        self.names()
            .map(|candidate| (candidate, edit_distance(&lowered, &candidate.to_lowercase())))
            .filter(|(candidate, distance)| *distance <= 2.max(candidate.len() / 4))
            .min_by_key(|(_, distance)| *distance)
            .map(|(candidate, _)| format!("did you mean '{}'?", candidate))
    }

    fn check_acyclic(&self) -> Result<()> {
        let mut finished = HashSet::new();
        for target in &self.targets {
            let mut path = Vec::new();
            self.visit_for_cycles(&target.name, &mut path, &mut finished)?;
        }
        Ok(())
    }

    fn visit_for_cycles<'a>(
        &'a self,
        name: &'a str,
        path: &mut Vec<&'a str>,
        finished: &mut HashSet<&'a str>,
    ) -> Result<()> {
        if finished.contains(name) {
            return Ok(());
        }
        if let Some(start) = path.iter().position(|&n| n == name) {
            let mut cycle: Vec<&str> = path[start..].to_vec();
            cycle.push(name);
            return Err(Error::CycleDetected {
                cycle: cycle.join(" -> "),
            });
        }

        path.push(name);
        if let Some(target) = self.get(name) {
            for dependency in &target.dependencies {
                self.visit_for_cycles(dependency, path, finished)?;
            }
        }
        path.pop();
        finished.insert(name);
        Ok(())
    }
}

/// Levenshtein distance, used only for target-name suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

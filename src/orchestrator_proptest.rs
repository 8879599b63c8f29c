//! Property-based tests for orchestrator ordering.
//!
//! These tests generate random acyclic target graphs and check that
//! dependency ordering and once-per-run execution hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::artifacts::ArtifactStore;
    use crate::error::{Error, Result};
    use crate::orchestrator::Orchestrator;
    use crate::runner::{CommandRunner, CommandStatus};
    use crate::target::{Invocation, Target, TargetGraph};
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    struct RecordingRunner {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, invocation: &Invocation) -> Result<CommandStatus> {
            self.calls.lock().unwrap().push(invocation.program.clone());
            Ok(CommandStatus::success())
        }
    }

    struct FixedArtifacts {
        present: HashSet<PathBuf>,
    }

    impl ArtifactStore for FixedArtifacts {
        fn exists(&self, path: &Path) -> bool {
            self.present.contains(path)
        }

        fn remove(&self, path: &Path) -> Result<()> {
            Err(Error::ArtifactMissing {
                path: path.display().to_string(),
            })
        }
    }

    fn name(i: usize) -> String {
        format!("t{}", i)
    }

    /// Target `i` may depend on any `j < i`, which keeps the graph acyclic.
    fn build_targets(edges: &[Vec<bool>]) -> Vec<Target> {
        edges
            .iter()
            .enumerate()
            .map(|(i, flags)| {
                let mut target = Target::new(name(i))
                    .produces(name(i))
                    .command(Invocation::new(name(i)));
                for (j, &flag) in flags.iter().enumerate().take(i) {
                    if flag {
                        target = target.depends_on(name(j));
                    }
                }
                target
            })
            .collect()
    }

    fn closure(targets: &[Target], root: &str, out: &mut HashSet<String>) {
        if !out.insert(root.to_string()) {
            return;
        }
        let target = targets.iter().find(|t| t.name == root).unwrap();
        for dependency in &target.dependencies {
            closure(targets, dependency, out);
        }
    }

    fn graph_strategy() -> impl Strategy<Value = (Vec<Vec<bool>>, Vec<bool>)> {
        (1usize..9).prop_flat_map(|n| {
            (
                prop::collection::vec(prop::collection::vec(any::<bool>(), n), n),
                prop::collection::vec(any::<bool>(), n),
            )
        })
    }

    fn run_goal(targets: Vec<Target>, present: HashSet<PathBuf>, goal: &str) -> Vec<String> {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let graph = TargetGraph::new(targets).unwrap();
        let mut orch = Orchestrator::new(
            graph,
            Box::new(RecordingRunner {
                calls: Arc::clone(&calls),
            }),
            Box::new(FixedArtifacts { present }),
        );
        orch.run(goal).unwrap();
        let recorded = calls.lock().unwrap().clone();
        recorded
    }

    proptest! {
        /// Property: with no artifacts present, exactly the goal's transitive
        /// dependencies run, each once, dependencies before dependents
        #[test]
        fn dependencies_run_first_and_once((edges, _) in graph_strategy()) {
            let targets = build_targets(&edges);
            let goal = name(targets.len() - 1);
            let calls = run_goal(targets.clone(), HashSet::new(), &goal);

            let unique: HashSet<&String> = calls.iter().collect();
            prop_assert_eq!(unique.len(), calls.len(), "a target ran twice: {:?}", calls);

            let mut expected = HashSet::new();
            closure(&targets, &goal, &mut expected);
            let ran: HashSet<String> = calls.iter().cloned().collect();
            prop_assert_eq!(ran, expected);

            for (position, call) in calls.iter().enumerate() {
                let target = targets.iter().find(|t| &t.name == call).unwrap();
                for dependency in &target.dependencies {
                    let dep_position = calls.iter().position(|c| c == dependency);
                    prop_assert!(
                        dep_position.is_some_and(|p| p < position),
                        "{} ran before its dependency {}",
                        call,
                        dependency
                    );
                }
            }

            prop_assert_eq!(calls.last(), Some(&goal));
        }

        /// Property: a target with its artifact present never runs, and every
        /// target that does run finds each dependency either already run or
        /// present
        #[test]
        fn present_artifacts_are_never_rebuilt((edges, present_flags) in graph_strategy()) {
            let targets = build_targets(&edges);
            let present: HashSet<PathBuf> = present_flags
                .iter()
                .enumerate()
                .filter(|(_, flag)| **flag)
                .map(|(i, _)| PathBuf::from(name(i)))
                .collect();
            let goal = name(targets.len() - 1);
            let calls = run_goal(targets.clone(), present.clone(), &goal);

            for (position, call) in calls.iter().enumerate() {
                prop_assert!(!present.contains(Path::new(call)), "{} was rebuilt", call);

                let target = targets.iter().find(|t| &t.name == call).unwrap();
                for dependency in &target.dependencies {
                    let ran_before = calls[..position].contains(dependency);
                    prop_assert!(
                        ran_before || present.contains(Path::new(dependency)),
                        "{} ran without {}",
                        call,
                        dependency
                    );
                }
            }
        }
    }
}

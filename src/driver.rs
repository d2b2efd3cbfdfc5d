//! Tree-of-entries driver.
//!
//! Test code is handed to the harness as a [`TestTree`]: named groups that
//! nest, with entry functions as leaves. Each entry declares its own suites and
//! cases against the [`Runner`] it receives. The driver walks the tree
//! depth-first in the order the children were supplied, opening a suite for
//! every group it descends into.

use crate::model::RunReport;
use crate::runner::Runner;

/// Root used when none is requested.
pub const DEFAULT_ROOT: &str = "test";

/// Leaf callable. Declares suites and cases on the runner.
pub type EntryFn = fn(&mut Runner);

#[derive(Debug, Clone)]
pub enum TestTree {
    Group { name: String, children: Vec<TestTree> },
    Entry { name: String, run: EntryFn },
}

impl TestTree {
    pub fn group(name: impl Into<String>, children: impl IntoIterator<Item = TestTree>) -> Self {
        Self::Group {
            name: name.into(),
            children: children.into_iter().collect(),
        }
    }

    pub fn entry(name: impl Into<String>, run: EntryFn) -> Self {
        Self::Entry {
            name: name.into(),
            run,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Group { name, .. } | Self::Entry { name, .. } => name,
        }
    }

    /// Direct child with the given name. Entries have no children.
    pub fn child(&self, name: &str) -> Option<&TestTree> {
        match self {
            Self::Group { children, .. } => children.iter().find(|c| c.name() == name),
            Self::Entry { .. } => None,
        }
    }

    pub fn child_names(&self) -> Vec<&str> {
        match self {
            Self::Group { children, .. } => children.iter().map(TestTree::name).collect(),
            Self::Entry { .. } => Vec::new(),
        }
    }
}

/// Picks the subtree a run starts from.
///
/// A requested name that is not a child of `tree` falls back to
/// [`DEFAULT_ROOT`]. If that is missing too, the whole tree is the root.
pub fn select_root<'t>(tree: &'t TestTree, requested: Option<&str>) -> &'t TestTree {
    if let Some(name) = requested.filter(|name| *name != DEFAULT_ROOT) {
        if let Some(root) = tree.child(name) {
            return root;
        }
        tracing::warn!(
            requested = name,
            known = ?tree.child_names(),
            "unknown test root; falling back to '{DEFAULT_ROOT}'"
        );
    }
    match tree.child(DEFAULT_ROOT) {
        Some(root) => root,
        None => {
            tracing::debug!("no '{DEFAULT_ROOT}' root; running the whole tree");
            tree
        }
    }
}

/// Runs one node: groups become suites, entries are invoked directly.
pub fn run_tree(tree: &TestTree, runner: &mut Runner) {
    match tree {
        TestTree::Group { name, children } => runner.describe(name.as_str(), |r| {
            for child in children {
                run_tree(child, r);
            }
        }),
        TestTree::Entry { name, run } => {
            tracing::debug!(entry = %name, "running entry");
            run(runner);
        }
    }
}

/// Runs the contents of the selected root. The root itself is a container,
/// not a suite, so its children become the top-level suites of the run.
pub fn run_root(tree: &TestTree, requested: Option<&str>, runner: &mut Runner) {
    let root = select_root(tree, requested);
    tracing::debug!(root = root.name(), "starting run");
    match root {
        TestTree::Group { children, .. } => {
            for child in children {
                run_tree(child, runner);
            }
        }
        entry @ TestTree::Entry { .. } => run_tree(entry, runner),
    }
}

/// Runs a tree from the selected root with a fresh runner.
pub fn run(tree: &TestTree, requested: Option<&str>) -> RunReport {
    let mut runner = Runner::new();
    run_root(tree, requested, &mut runner);
    runner.finish()
}

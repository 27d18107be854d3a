//! Named build tasks with dependency ordering.
//!
//! ```text
//! build ─┬─ clean
//!        └─ version ─┬─ minify:js
//!                    ├─ minify:css
//!                    └─ minify:theme
//! copy   (dev sessions and watch targets)
//! ```
//!
//! A task runs its dependencies first; each task runs at most once per
//! [`TaskRunner::run`] call.

mod builtin;

pub use builtin::{TaskContext, TaskOptions};

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::asset::AssetError;

/// What a task does when it runs. Alias tasks have no action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Clean,
    MinifyJs,
    MinifyCss,
    MinifyTheme,
    Version,
    Copy,
}

#[derive(Debug, Clone)]
pub struct Task {
    pub name: String,
    pub deps: Vec<String>,
    pub action: Option<TaskAction>,
}

impl Task {
    pub fn new(name: impl Into<String>, action: TaskAction) -> Self {
        Self {
            name: name.into(),
            deps: Vec::new(),
            action: Some(action),
        }
    }

    /// A task that only runs its dependencies.
    pub fn alias(name: impl Into<String>, deps: &[&str]) -> Self {
        Self {
            name: name.into(),
            deps: deps.iter().map(|d| d.to_string()).collect(),
            action: None,
        }
    }

    pub fn after(mut self, deps: &[&str]) -> Self {
        self.deps.extend(deps.iter().map(|d| d.to_string()));
        self
    }
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("unknown task `{0}`")]
    Unknown(String),

    #[error("task dependency cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    #[error("task `{task}` failed")]
    Failed {
        task: String,
        #[source]
        source: AssetError,
    },
}

/// Registry of named tasks.
#[derive(Debug, Default)]
pub struct TaskRunner {
    tasks: FxHashMap<String, Task>,
}

impl TaskRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner preloaded with the built-in pipeline.
    pub fn with_builtin() -> Self {
        let mut runner = Self::new();
        runner.register(Task::new("clean", TaskAction::Clean));
        runner.register(Task::new("minify:js", TaskAction::MinifyJs));
        runner.register(Task::new("minify:css", TaskAction::MinifyCss));
        runner.register(Task::new("minify:theme", TaskAction::MinifyTheme));
        runner.register(
            Task::new("version", TaskAction::Version).after(&["minify:js", "minify:css", "minify:theme"]),
        );
        runner.register(Task::new("copy", TaskAction::Copy));
        runner.register(Task::alias("build", &["clean", "version"]));
        runner
    }

    /// Register a task, replacing any task with the same name.
    pub fn register(&mut self, task: Task) {
        self.tasks.insert(task.name.clone(), task);
    }

    /// Execution order for `name`: dependencies first, each task once.
    pub fn plan(&self, name: &str) -> Result<Vec<&Task>, TaskError> {
        let mut order = Vec::new();
        let mut done = FxHashSet::default();
        let mut stack = Vec::new();
        self.visit(name, &mut stack, &mut done, &mut order)?;
        Ok(order)
    }

    fn visit<'a>(
        &'a self,
        name: &str,
        stack: &mut Vec<String>,
        done: &mut FxHashSet<&'a str>,
        order: &mut Vec<&'a Task>,
    ) -> Result<(), TaskError> {
        let task = self
            .tasks
            .get(name)
            .ok_or_else(|| TaskError::Unknown(name.to_string()))?;

        if done.contains(task.name.as_str()) {
            return Ok(());
        }
        if let Some(pos) = stack.iter().position(|n| n == name) {
            let mut cycle = stack[pos..].to_vec();
            cycle.push(name.to_string());
            return Err(TaskError::Cycle(cycle));
        }

        stack.push(name.to_string());
        for dep in &task.deps {
            self.visit(dep, stack, done, order)?;
        }
        stack.pop();

        done.insert(task.name.as_str());
        order.push(task);
        Ok(())
    }

    /// Run `name` and its dependencies, stopping at the first failure.
    ///
    /// Returns the names of the tasks that ran, in order.
    pub fn run(&self, name: &str, ctx: &mut TaskContext<'_>) -> Result<Vec<String>, TaskError> {
        let plan = self.plan(name)?;
        let mut ran = Vec::with_capacity(plan.len());
        for task in plan {
            if let Some(action) = task.action {
                crate::debug!("task"; "running {}", task.name);
                ctx.execute(action).map_err(|source| TaskError::Failed {
                    task: task.name.clone(),
                    source,
                })?;
            }
            ran.push(task.name.clone());
        }
        Ok(ran)
    }
}

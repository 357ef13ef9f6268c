// ABOUTME: Release task graph: stop <- copy <- start, with release aggregating copy and start.
// ABOUTME: Scheduling a task yields its dependencies first, each step exactly once.

use std::fmt;
use std::str::FromStr;

/// A side-effecting step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Stop,
    Copy,
    Start,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Step::Stop => "stop",
            Step::Copy => "copy",
            Step::Start => "start",
        })
    }
}

/// Something an operator can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    Stop,
    Copy,
    Start,
    /// Runs nothing itself; depends on copy and start.
    Release,
}

impl Task {
    pub const ALL: [Task; 4] = [Task::Stop, Task::Copy, Task::Start, Task::Release];

    pub fn dependencies(&self) -> &'static [Task] {
        match self {
            Task::Stop => &[],
            Task::Copy => &[Task::Stop],
            Task::Start => &[Task::Copy],
            Task::Release => &[Task::Copy, Task::Start],
        }
    }

    /// The step this task performs itself.
    pub fn step(&self) -> Option<Step> {
        match self {
            Task::Stop => Some(Step::Stop),
            Task::Copy => Some(Step::Copy),
            Task::Start => Some(Step::Start),
            Task::Release => None,
        }
    }

    /// Steps to run for this task, dependencies first.
    pub fn schedule(&self) -> Vec<Step> {
        let mut visited = Vec::new();
        let mut steps = Vec::new();
        self.visit(&mut visited, &mut steps);
        steps
    }

    fn visit(self, visited: &mut Vec<Task>, steps: &mut Vec<Step>) {
        if visited.contains(&self) {
            return;
        }
        visited.push(self);
        for dep in self.dependencies() {
            dep.visit(visited, steps);
        }
        if let Some(step) = self.step() {
            steps.push(step);
        }
    }

    /// Whether running this task copies the artifact.
    pub fn needs_artifact(&self) -> bool {
        self.schedule().contains(&Step::Copy)
    }
}

impl FromStr for Task {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stop" | "stopService" => Ok(Task::Stop),
            "copy" | "copyJar" => Ok(Task::Copy),
            "start" | "startService" => Ok(Task::Start),
            "release" => Ok(Task::Release),
            _ => Err(format!("unknown task: {}", s)),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Stop => write!(f, "stop"),
            Task::Copy => write!(f, "copy"),
            Task::Start => write!(f, "start"),
            Task::Release => write!(f, "release"),
        }
    }
}

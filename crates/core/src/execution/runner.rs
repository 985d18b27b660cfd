//! Ordered task runner
//!
//! A [`Task`] is a named, ordered composition of steps executed fail-fast.
//! Steps are stored as direct callables together with a human-readable
//! label; the runner invokes them strictly in declaration order and stops
//! at the first one reporting failure. The runner itself has no side
//! effects beyond whatever each step performs, and no rollback.

use std::time::{Duration, Instant};

use crate::types::{TestbedError, TestbedResult};

/// A single step: an opaque predicate-returning unit of work
type Step<'a> = Box<dyn FnMut() -> bool + 'a>;

/// Result of a successful task run, immutable after creation
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub message: String,
    /// Total wall-clock time since `run()` began, from a monotonic clock
    pub elapsed: Duration,
}

/// A named unit of work composed of an ordered sequence of steps
///
/// Built fluently via [`Task::add_step`], then run. A failing step is
/// final for that `run()` call; steps are responsible for their own
/// idempotence if the task is re-run.
pub struct Task<'a> {
    name: String,
    steps: Vec<(String, Step<'a>)>,
}

impl<'a> Task<'a> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a step to the ordered list; no uniqueness constraint
    pub fn add_step(mut self, label: impl Into<String>, step: impl FnMut() -> bool + 'a) -> Self {
        self.steps.push((label.into(), Box::new(step)));
        self
    }

    /// Execute all steps in declaration order, aborting on the first failure
    pub fn run(&mut self) -> TestbedResult<ExecutionResult> {
        let started = Instant::now();

        if self.steps.is_empty() {
            return Err(TestbedError::Config(format!(
                "no steps given for execution regarding {}",
                self.name
            )));
        }

        for (label, step) in &mut self.steps {
            if !step() {
                return Err(TestbedError::Execution(format!(
                    "error executing {} step '{}', execution stopped",
                    self.name, label
                )));
            }
        }

        Ok(ExecutionResult {
            message: format!("{} tasks executed correctly", self.name),
            elapsed: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_step(counter: &Rc<Cell<usize>>, result: bool) -> impl FnMut() -> bool + '_ {
        move || {
            counter.set(counter.get() + 1);
            result
        }
    }

    #[test]
    fn empty_task_fails_with_configuration_error() {
        let mut task = Task::new("Empty");
        let err = task.run().expect_err("empty task must fail");

        assert!(matches!(err, TestbedError::Config(_)));
        assert!(err.to_string().contains("no steps given for execution"));
    }

    #[test]
    fn all_passing_steps_succeed_with_elapsed_time() {
        let counter = Rc::new(Cell::new(0));
        let mut task = Task::new("Passing")
            .add_step("first", counting_step(&counter, true))
            .add_step("second", counting_step(&counter, true));

        let before = Instant::now();
        let result = task.run().expect("all-true task must succeed");
        let wall = before.elapsed();

        assert_eq!(counter.get(), 2);
        assert_eq!(result.message, "Passing tasks executed correctly");
        assert!(result.elapsed <= wall);
    }

    #[test]
    fn execution_stops_at_first_failing_step() {
        let a = Rc::new(Cell::new(0));
        let b = Rc::new(Cell::new(0));
        let c = Rc::new(Cell::new(0));

        let mut task = Task::new("Scenario")
            .add_step("a", counting_step(&a, true))
            .add_step("b", counting_step(&b, false))
            .add_step("c", counting_step(&c, true));

        let err = task.run().expect_err("failing step must abort the run");

        assert!(matches!(err, TestbedError::Execution(_)));
        assert!(err.to_string().contains("Scenario"));
        assert!(err.to_string().contains("execution stopped"));
        assert_eq!(a.get(), 1, "step before the failure runs once");
        assert_eq!(b.get(), 1, "failing step runs once");
        assert_eq!(c.get(), 0, "steps after the failure never run");
    }

    #[test]
    fn duplicate_steps_are_allowed_and_run_in_order() {
        let counter = Rc::new(Cell::new(0));
        let mut task = Task::new("Repeat")
            .add_step("tick", counting_step(&counter, true))
            .add_step("tick", counting_step(&counter, true))
            .add_step("tick", counting_step(&counter, true));

        task.run().expect("repeated steps must all run");
        assert_eq!(counter.get(), 3);
    }

    #[test]
    fn failing_first_step_runs_exactly_once() {
        let first = Rc::new(Cell::new(0));
        let rest = Rc::new(Cell::new(0));

        let mut task = Task::new("FailFast")
            .add_step("first", counting_step(&first, false))
            .add_step("rest", counting_step(&rest, true));

        task.run().expect_err("first step failure must abort");
        assert_eq!(first.get(), 1);
        assert_eq!(rest.get(), 0);
    }
}

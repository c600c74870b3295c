//! Declarative step plans.
//!
//! A provisioning run is an ordered list of named steps. Each step may
//! carry a precondition probe: when the probe reports the step's
//! postcondition already holds, the step is skipped instead of re-run.
//! Execution is strictly sequential and fail-fast; the first error aborts
//! the plan and surfaces the failing step's diagnostics.

use tracing::info;

use crate::cli::output;
use crate::error::Result;

/// Outcome of a precondition probe.
pub enum Readiness {
    /// The step must run.
    Run,
    /// The postcondition already holds; skip, with a reason for the log.
    Skip(String),
}

type Probe = Box<dyn FnOnce() -> Result<Readiness>>;
type Action = Box<dyn FnOnce() -> Result<()>>;

/// One named unit of work in a plan.
pub struct Step {
    name: String,
    probe: Option<Probe>,
    action: Action,
}

impl Step {
    pub fn new(name: impl Into<String>, action: impl FnOnce() -> Result<()> + 'static) -> Self {
        Self {
            name: name.into(),
            probe: None,
            action: Box::new(action),
        }
    }

    /// Attach a precondition probe.
    pub fn unless(mut self, probe: impl FnOnce() -> Result<Readiness> + 'static) -> Self {
        self.probe = Some(Box::new(probe));
        self
    }
}

/// Ordered, fail-fast list of steps.
pub struct Plan {
    title: String,
    steps: Vec<Step>,
}

impl Plan {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Step names in execution order, for `--dry-run`.
    pub fn outline(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.name.clone()).collect()
    }

    /// Print the plan without executing anything.
    pub fn preview(&self) {
        output::header(&self.title);
        for (i, step) in self.steps.iter().enumerate() {
            output::list_item(&format!("{}. {}", i + 1, step.name));
        }
    }

    /// Run every step in order. The first error propagates immediately;
    /// later steps are never reached.
    pub fn execute(self) -> Result<()> {
        info!(plan = %self.title, steps = self.steps.len(), "executing plan");
        for step in self.steps {
            if let Some(probe) = step.probe {
                if let Readiness::Skip(reason) = probe()? {
                    info!(step = %step.name, %reason, "skipped");
                    output::skipped(&step.name, &reason);
                    continue;
                }
            }
            output::progress(&step.name);
            match (step.action)() {
                Ok(()) => output::progress_done(true),
                Err(e) => {
                    output::progress_done(false);
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}

//! Test reporting channel — named sub-steps, PASS/FAIL output and a summary.
//!
//! Every failure is recorded and printed; nothing here aborts. A test case
//! ends by calling [`Reporter::assert_all_passed`].

/// One failure message, attributed to the sub-step it happened in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub step: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub name: String,
    pub passed: bool,
}

/// An open sub-step. Collects failures until handed to [`Reporter::record`].
#[derive(Debug)]
pub struct StepReport {
    name: String,
    failures: Vec<String>,
}

impl StepReport {
    pub fn error(&mut self, message: impl Into<String>) {
        self.failures.push(message.into());
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct Reporter {
    test_num: usize,
    steps: Vec<StepOutcome>,
    failures: Vec<Failure>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Reporter {
    pub fn new(test_num: usize) -> Self {
        Self {
            test_num,
            steps: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn test_num(&self) -> usize {
        self.test_num
    }

    pub fn step(&self, name: impl Into<String>) -> StepReport {
        let name = name.into();
        tracing::debug!(test_num = self.test_num, step = %name, "step started");
        StepReport {
            name,
            failures: Vec::new(),
        }
    }

    pub fn record(&mut self, step: StepReport) {
        let passed = step.passed();
        if passed {
            tracing::info!(test_num = self.test_num, step = %step.name, "step passed");
            println!("PASS  [#{}] {}", self.test_num, step.name);
        } else {
            println!("FAIL  [#{}] {}", self.test_num, step.name);
        }
        for message in step.failures {
            tracing::warn!(test_num = self.test_num, step = %step.name, error = %message, "step failed");
            println!("        {message}");
            self.failures.push(Failure {
                step: Some(step.name.clone()),
                message,
            });
        }
        self.steps.push(StepOutcome {
            name: step.name,
            passed,
        });
    }

    /// Record a failure outside any sub-step.
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(test_num = self.test_num, error = %message, "failure");
        println!("FAIL  [#{}] {message}", self.test_num);
        self.failures.push(Failure {
            step: None,
            message,
        });
    }

    pub fn steps(&self) -> &[StepOutcome] {
        &self.steps
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn failure_messages(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.message.as_str()).collect()
    }

    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn print_summary(&self) {
        let passed = self.steps.iter().filter(|s| s.passed).count();
        println!();
        println!("────────────────────────────────────────────────────");
        println!(
            "Test #{}: {} step(s) passed, {} step(s) failed, {} failure(s)",
            self.test_num,
            passed,
            self.steps.len() - passed,
            self.failures.len()
        );
    }

    /// Print the summary, then panic listing every failure if any were
    /// recorded.
    pub fn assert_all_passed(&self) {
        self.print_summary();
        if self.all_passed() {
            return;
        }
        let lines: Vec<String> = self
            .failures
            .iter()
            .map(|f| match &f.step {
                Some(step) => format!("  {step}: {}", f.message),
                None => format!("  {}", f.message),
            })
            .collect();
        panic!(
            "test #{} had {} failure(s):\n{}",
            self.test_num,
            self.failures.len(),
            lines.join("\n")
        );
    }
}

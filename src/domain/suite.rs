#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Passed,
    Failed(String),
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    pub name: String,
    pub outcome: CaseOutcome,
}

/// Outcome of one check suite. A suite never aborts the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteReport {
    pub suite: String,
    pub cases: Vec<CaseResult>,
}

impl SuiteReport {
    pub fn new(suite: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            cases: Vec::new(),
        }
    }

    pub fn pass(&mut self, case: &str) {
        self.push(case, CaseOutcome::Passed);
    }

    pub fn fail(&mut self, case: &str, message: impl Into<String>) {
        self.push(case, CaseOutcome::Failed(message.into()));
    }

    pub fn skip(&mut self, case: &str, reason: impl Into<String>) {
        self.push(case, CaseOutcome::Skipped(reason.into()));
    }

    fn push(&mut self, case: &str, outcome: CaseOutcome) {
        self.cases.push(CaseResult {
            name: case.to_string(),
            outcome,
        });
    }

    pub fn outcome(&self, case: &str) -> Option<&CaseOutcome> {
        self.cases
            .iter()
            .find(|c| c.name == case)
            .map(|c| &c.outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cases.iter().filter_map(|c| match &c.outcome {
            CaseOutcome::Failed(msg) => Some((c.name.as_str(), msg.as_str())),
            _ => None,
        })
    }

    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Skipped(_)))
    }

    fn count(&self, pred: impl Fn(&CaseOutcome) -> bool) -> usize {
        self.cases.iter().filter(|c| pred(&c.outcome)).count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

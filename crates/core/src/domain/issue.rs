// Issue Report - ordered violations found by one monitor run

/// Ordered list of human-readable issues.
///
/// The producing check is encoded in each message's prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueReport(Vec<String>);

impl IssueReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = String>) {
        self.0.extend(issues);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

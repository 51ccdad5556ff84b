use kube::api::LogParams;

/// A pod discovered in the target namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub containers: Vec<String>,
}

/// Log options applied uniformly to every pod in one run.
///
/// `tail_lines` and `container` keep "not set" apart from zero and the
/// empty string: `Some(0)` asks for no history, `None` for the server default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamRequest {
    pub follow: bool,
    pub tail_lines: Option<i64>,
    pub container: Option<String>,
}

impl StreamRequest {
    pub fn to_log_params(&self) -> LogParams {
        LogParams {
            follow: self.follow,
            tail_lines: self.tail_lines,
            container: self.container.clone(),
            ..Default::default()
        }
    }
}

/// One completed line, tagged with the pod it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub source: String,
    pub text: String,
}

/// How a single pod stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    Ended,
    Cancelled,
    OpenFailed,
    ReadFailed,
}

impl StreamOutcome {
    pub fn is_failure(self) -> bool {
        matches!(self, StreamOutcome::OpenFailed | StreamOutcome::ReadFailed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub matched: usize,
    pub finished: usize,
    pub failed: usize,
}

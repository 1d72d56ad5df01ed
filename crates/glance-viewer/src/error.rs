/// Failure reported by a [`PagerHost`](crate::PagerHost) for a scroll request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerError {
    IndexOutOfRange { requested: usize, len: usize },
    /// The pager has not been laid out yet.
    NotLaidOut,
    Rejected { requested: usize },
}

impl std::fmt::Display for PagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PagerError::IndexOutOfRange { requested, len } => {
                write!(f, "index {requested} out of range for {len} pages")
            }
            PagerError::NotLaidOut => write!(f, "pager is not laid out"),
            PagerError::Rejected { requested } => {
                write!(f, "pager rejected scroll to index {requested}")
            }
        }
    }
}

impl std::error::Error for PagerError {}

/// Non-fatal problem surfaced to the host through `on_diagnostic`.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerDiagnostic {
    ScrollToIndexFailed { index: usize, error: PagerError },
}

impl std::fmt::Display for ViewerDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewerDiagnostic::ScrollToIndexFailed { index, error } => {
                write!(f, "scroll to index {index} failed: {error}")
            }
        }
    }
}

//! Progress reporting for long-running campaign stages.
//!
//! The engine pushes coarse events through an optional callback and owns no
//! terminal or UI concern; consumers decide how to render them.

/// Coarse events emitted while planning and executing a task graph.
#[derive(Debug, Clone)]
pub enum Progress {
    /// A named campaign stage began.
    StageStart { name: &'static str },
    /// The current stage completed.
    StageFinish,

    /// A batch of execution units is about to run.
    UnitsStart { total: u64 },
    /// One unit of the batch finished, successfully or not.
    UnitFinished { label: String, failed: bool },
    /// The whole batch has been drained.
    UnitsFinish,

    /// Free-form summary text.
    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Hands engine events to an optional observer. Reporting through a reporter
/// built with [`ProgressReporter::new`] is a no-op.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn silent_reporter_swallows_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::StageStart { name: "Planning" });
        reporter.report(Progress::Message("dropped".to_string()));
        reporter.report(Progress::StageFinish);
    }

    #[test]
    fn callback_sees_events_in_order() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(event);
        }));

        reporter.report(Progress::StageStart { name: "Execution" });
        reporter.report(Progress::UnitsStart { total: 6 });
        reporter.report(Progress::UnitsFinish);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[0],
            Progress::StageStart { name: "Execution" }
        ));
        assert!(matches!(events[1], Progress::UnitsStart { total: 6 }));
        assert!(matches!(events[2], Progress::UnitsFinish));
    }
}

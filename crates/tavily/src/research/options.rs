use anyhow::Result;
use tokio_util::sync::CancellationToken;

use super::types::{ResearchProgress, Source};
use crate::shutdown::is_shutting_down;

pub type ProgressHook = Box<dyn FnMut(ResearchProgress) -> Result<()> + Send>;
pub type SourceHook = Box<dyn FnMut(Vec<Source>) -> Result<()> + Send>;

/// Optional hooks and cancellation for a single research stream.
#[derive(Default)]
pub struct StreamResearchOptions {
    pub(crate) progress_hook: Option<ProgressHook>,
    pub(crate) source_hook: Option<SourceHook>,
    pub(crate) cancellation: Option<CancellationToken>,
}

impl StreamResearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called for every research step the remote agent reports, and once more when the stream completes.
    pub fn with_progress_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(ResearchProgress) -> Result<()> + Send + 'static,
    {
        self.progress_hook = Some(Box::new(hook));
        self
    }

    /// Called with every source of a `sources` event.
    pub fn with_source_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(Vec<Source>) -> Result<()> + Send + 'static,
    {
        self.source_hook = Some(Box::new(hook));
        self
    }

    /// Also stop when this token is cancelled. The process-wide shutdown signal is still honoured.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub(crate) fn report_progress(&mut self, progress: ResearchProgress) -> Result<()> {
        match self.progress_hook.as_mut() {
            Some(hook) => hook(progress),
            None => Ok(()),
        }
    }

    pub(crate) fn report_sources(&mut self, sources: Vec<Source>) -> Result<()> {
        match self.source_hook.as_mut() {
            Some(hook) => hook(sources),
            None => Ok(()),
        }
    }

    /// True once either the per-call token or the process-wide shutdown signal fired.
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
            || is_shutting_down()
    }

    pub(crate) fn has_source_hook(&self) -> bool {
        self.source_hook.is_some()
    }
}

impl std::fmt::Debug for StreamResearchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamResearchOptions")
            .field("progress_hook", &self.progress_hook.is_some())
            .field("source_hook", &self.source_hook.is_some())
            .field("cancellation", &self.cancellation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_missing_hooks_are_noops() {
        let mut options = StreamResearchOptions::new();
        assert!(options.report_progress(ResearchProgress::done()).is_ok());
        assert!(options.report_sources(vec![Source::default()]).is_ok());
        assert!(!options.has_source_hook());
    }

    #[test]
    fn test_later_registration_replaces_earlier() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let first = calls.clone();
        let second = calls.clone();

        let mut options = StreamResearchOptions::new()
            .with_progress_hook(move |p| {
                first.lock().unwrap().push(format!("first:{}", p.name));
                Ok(())
            })
            .with_progress_hook(move |p| {
                second.lock().unwrap().push(format!("second:{}", p.name));
                Ok(())
            });

        options.report_progress(ResearchProgress::done()).unwrap();
        assert_eq!(*calls.lock().unwrap(), vec!["second:Done".to_string()]);
    }

    #[test]
    fn test_per_call_token_cancels() {
        let token = CancellationToken::new();
        let options = StreamResearchOptions::new().with_cancellation(token.clone());
        assert_eq!(options.is_cancelled(), is_shutting_down());

        token.cancel();
        assert!(options.is_cancelled());
    }

    #[test]
    fn test_hook_error_is_returned() {
        let mut options =
            StreamResearchOptions::new().with_source_hook(|_| Err(anyhow!("source hook failed")));
        assert!(options.has_source_hook());

        let err = options.report_sources(Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "source hook failed");
    }
}

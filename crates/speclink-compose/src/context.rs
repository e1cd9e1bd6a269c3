//! Per-session resolution state.
//!
//! A [`ResolutionContext`] lives for exactly one top-level resolution. It
//! caches ancestors loaded during the session, tracks the locations whose
//! subtrees are currently being resolved (for cycle detection), and
//! accumulates diagnostics.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use speclink_model::SpecDocument;

use crate::diagnostic::Diagnostic;
use crate::location::Location;

/// Bookkeeping for one composition session.
#[derive(Debug, Default)]
pub struct ResolutionContext {
    loaded: HashMap<Location, Arc<SpecDocument>>,
    stack: Vec<Location>,
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
    max_errors: Option<usize>,
    suppressed_errors: usize,
    ancestors: Vec<Location>,
}

impl ResolutionContext {
    pub fn new(max_errors: Option<usize>) -> Self {
        Self {
            max_errors,
            ..Self::default()
        }
    }

    /// Whether `location` is on the resolution stack.
    pub fn is_in_progress(&self, location: &Location) -> bool {
        self.stack.contains(location)
    }

    /// The cycle closed by revisiting `location`, from its first stack
    /// entry back to itself.
    pub fn cycle_path(&self, location: &Location) -> Vec<Location> {
        let start = self
            .stack
            .iter()
            .position(|l| l == location)
            .unwrap_or(self.stack.len());
        let mut path: Vec<Location> = self.stack[start..].to_vec();
        path.push(location.clone());
        path
    }

    /// Current stack, outermost first.
    pub fn stack(&self) -> &[Location] {
        &self.stack
    }

    /// Push `location` and return a guard that pops it when dropped.
    ///
    /// The guard derefs to the context so recursion can continue through it.
    pub fn enter(&mut self, location: Location) -> StackFrame<'_> {
        self.stack.push(location);
        StackFrame { ctx: self }
    }

    /// A document already loaded in this session.
    pub fn cached(&self, location: &Location) -> Option<Arc<SpecDocument>> {
        self.loaded.get(location).cloned()
    }

    /// Remember a loaded document for the rest of the session.
    pub fn remember(&mut self, location: Location, document: Arc<SpecDocument>) {
        if !self.ancestors.contains(&location) {
            self.ancestors.push(location.clone());
        }
        self.loaded.insert(location, document);
    }

    /// Record a diagnostic, routing it by severity.
    ///
    /// Errors beyond the configured cap are counted but not stored.
    pub fn record(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(
            severity = %diagnostic.severity,
            code = %diagnostic.code,
            "{}",
            diagnostic.message
        );
        if !diagnostic.is_error() {
            self.warnings.push(diagnostic);
            return;
        }

        match self.max_errors {
            Some(cap) if self.errors.len() >= cap => self.suppressed_errors += 1,
            _ => self.errors.push(diagnostic),
        }
    }

    /// Record several diagnostics in order.
    pub fn record_all(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for d in diagnostics {
            self.record(d);
        }
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Errors dropped because the cap was reached.
    pub fn suppressed_errors(&self) -> usize {
        self.suppressed_errors
    }

    /// No errors recorded, including suppressed ones.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.suppressed_errors == 0
    }

    /// Ancestor locations loaded in this session, in first-visit order.
    pub fn ancestors(&self) -> &[Location] {
        &self.ancestors
    }

    /// Consume the context, yielding errors, warnings, ancestors and the
    /// suppressed-error count.
    pub fn finish(self) -> (Vec<Diagnostic>, Vec<Diagnostic>, Vec<Location>, usize) {
        (
            self.errors,
            self.warnings,
            self.ancestors,
            self.suppressed_errors,
        )
    }
}

/// A resolution stack entry, popped on drop.
///
/// Dropping covers every exit path out of a parent's subtree, including
/// early returns and unwinding.
#[derive(Debug)]
pub struct StackFrame<'a> {
    ctx: &'a mut ResolutionContext,
}

impl Deref for StackFrame<'_> {
    type Target = ResolutionContext;

    fn deref(&self) -> &ResolutionContext {
        self.ctx
    }
}

impl DerefMut for StackFrame<'_> {
    fn deref_mut(&mut self) -> &mut ResolutionContext {
        self.ctx
    }
}

impl Drop for StackFrame<'_> {
    fn drop(&mut self) {
        self.ctx.stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticCode;

    fn loc(s: &str) -> Location {
        Location::new(s)
    }

    #[test]
    fn frame_pops_on_drop() {
        let mut ctx = ResolutionContext::new(None);
        {
            let mut outer = ctx.enter(loc("/a.yaml"));
            assert!(outer.is_in_progress(&loc("/a.yaml")));
            {
                let inner = outer.enter(loc("/b.yaml"));
                assert_eq!(inner.stack().len(), 2);
            }
            assert_eq!(outer.stack().len(), 1);
            assert!(!outer.is_in_progress(&loc("/b.yaml")));
        }
        assert!(ctx.stack().is_empty());
    }

    #[test]
    fn frame_pops_on_early_return() {
        fn fails(ctx: &mut ResolutionContext) -> Result<(), ()> {
            let _frame = ctx.enter(Location::new("/x.yaml"));
            Err(())
        }

        let mut ctx = ResolutionContext::new(None);
        assert!(fails(&mut ctx).is_err());
        assert!(ctx.stack().is_empty());
    }

    #[test]
    fn cycle_path_starts_at_first_occurrence() {
        let mut ctx = ResolutionContext::new(None);
        let mut f1 = ctx.enter(loc("/root.yaml"));
        let mut f2 = f1.enter(loc("/a.yaml"));
        let f3 = f2.enter(loc("/b.yaml"));

        let path: Vec<String> = f3
            .cycle_path(&loc("/a.yaml"))
            .iter()
            .map(|l| l.to_string())
            .collect();
        assert_eq!(path, vec!["/a.yaml", "/b.yaml", "/a.yaml"]);
    }

    #[test]
    fn errors_and_warnings_are_separated() {
        let mut ctx = ResolutionContext::new(None);
        ctx.record(Diagnostic::warning(
            DiagnosticCode::CircularInheritanceAllowed,
            "followed",
        ));
        assert!(ctx.is_valid());

        ctx.record(Diagnostic::error(DiagnosticCode::ParentLoadError, "missing"));
        assert!(!ctx.is_valid());
        assert_eq!(ctx.errors().len(), 1);
        assert_eq!(ctx.warnings().len(), 1);
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn recorded_diagnostics_log_below_warn() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut ctx = ResolutionContext::new(None);
            ctx.record(Diagnostic::error(DiagnosticCode::ParentLoadError, "missing parent"));
            ctx.record(Diagnostic::warning(
                DiagnosticCode::CircularInheritanceAllowed,
                "followed",
            ));
            assert_eq!(ctx.errors().len(), 1);
        });

        assert!(captured.0.lock().unwrap().is_empty());
    }

    #[test]
    fn error_cap_suppresses_but_stays_invalid() {
        let mut ctx = ResolutionContext::new(Some(2));
        for i in 0..5 {
            ctx.record(Diagnostic::error(
                DiagnosticCode::ParentLoadError,
                format!("e{i}"),
            ));
        }
        assert_eq!(ctx.errors().len(), 2);
        assert_eq!(ctx.suppressed_errors(), 3);
        assert!(!ctx.is_valid());
    }

    #[test]
    fn ancestors_recorded_once_in_order() {
        let mut ctx = ResolutionContext::new(None);
        ctx.remember(loc("/b.yaml"), Arc::new(SpecDocument::new("b")));
        ctx.remember(loc("/a.yaml"), Arc::new(SpecDocument::new("a")));
        ctx.remember(loc("/b.yaml"), Arc::new(SpecDocument::new("b")));

        assert_eq!(ctx.ancestors(), &[loc("/b.yaml"), loc("/a.yaml")]);
        assert!(ctx.cached(&loc("/a.yaml")).is_some());
        assert!(ctx.cached(&loc("/c.yaml")).is_none());
    }
}

//! Renderers projecting constraints into formal output syntaxes
//!
//! A [`Backend`] knows one output syntax. A [`Renderer`] drives a backend
//! and owns the sink, writing each constraint with a single `write_all` so
//! that output is never split in the middle of a constraint.

pub mod config;
mod functional;
mod ntriples;

use std::collections::{BTreeMap, HashSet};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::model::{Constraint, ConstraintTag};

pub use config::RenderConfig;
pub use functional::FunctionalSyntax;
pub use ntriples::NTriples;

/// Errors that can occur while rendering
#[derive(Debug, Error)]
pub enum RenderError {
    /// The backend has no rule for this kind
    #[error("the {backend} backend cannot render {kind} constraints")]
    UnsupportedConstraintKind {
        kind: ConstraintTag,
        backend: &'static str,
    },

    /// The sink rejected a write
    #[error("failed to write output: {0}")]
    SinkWriteError(#[from] io::Error),
}

impl RenderError {
    pub(crate) fn unsupported(kind: ConstraintTag, backend: &'static str) -> Self {
        RenderError::UnsupportedConstraintKind { kind, backend }
    }
}

/// One output syntax
pub trait Backend {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    /// Whether [`Backend::format`] has a rule for this kind
    fn supports(&self, tag: ConstraintTag) -> bool;

    /// Text written once, before the first constraint
    fn prelude(&self) -> Option<String> {
        None
    }

    /// Append the rendering of `constraint` to `out`
    ///
    /// `ordinal` counts constraints written by the driving renderer, from 1.
    fn format(&self, constraint: &Constraint, ordinal: usize, out: &mut String) -> Result<(), RenderError>;
}

/// Drives a backend over an owned sink
#[derive(Debug)]
pub struct Renderer<W: Write, B: Backend> {
    sink: W,
    backend: B,
    written: usize,
    prelude_done: bool,
    warned: HashSet<ConstraintTag>,
}

impl<W: Write, B: Backend> Renderer<W, B> {
    pub fn new(sink: W, backend: B) -> Self {
        Self {
            sink,
            backend,
            written: 0,
            prelude_done: false,
            warned: HashSet::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of constraints written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Render one constraint; `None` writes nothing
    pub fn render(&mut self, constraint: Option<&Constraint>) -> Result<(), RenderError> {
        let Some(constraint) = constraint else {
            return Ok(());
        };

        let mut buffer = String::new();
        if !self.prelude_done {
            if let Some(prelude) = self.backend.prelude() {
                buffer.push_str(&prelude);
            }
        }

        if let Err(err) = self.backend.format(constraint, self.written + 1, &mut buffer) {
            if let RenderError::UnsupportedConstraintKind { kind, backend } = &err {
                if self.warned.insert(*kind) {
                    tracing::warn!(%kind, backend, "unsupported constraint kind, skipping");
                } else {
                    tracing::debug!(%kind, property = %constraint.property, "skipping unsupported constraint");
                }
            }
            return Err(err);
        }

        self.sink.write_all(buffer.as_bytes())?;
        self.prelude_done = true;
        self.written += 1;
        tracing::debug!(property = %constraint.property, kind = %constraint.tag(), backend = self.backend.name(), "rendered constraint");
        Ok(())
    }

    /// Flush the sink and hand it back
    pub fn finish(mut self) -> Result<W, RenderError> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}

/// Outcome of [`render_all`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Constraints written to the sink
    pub rendered: usize,
    /// Constraints skipped because the backend has no rule, per kind
    pub unsupported: BTreeMap<ConstraintTag, usize>,
    /// Whether the pass stopped early because of cancellation
    pub cancelled: bool,
}

impl RenderSummary {
    pub fn skipped(&self) -> usize {
        self.unsupported.values().sum()
    }
}

/// Render a sequence of constraints in order
///
/// `cancel` is checked between constraints only, so the sink always ends on
/// a constraint boundary. Unsupported kinds are skipped and counted; sink
/// errors abort the pass.
pub fn render_all<'c, W, B, I>(
    renderer: &mut Renderer<W, B>,
    constraints: I,
    cancel: &AtomicBool,
) -> Result<RenderSummary, RenderError>
where
    W: Write,
    B: Backend,
    I: IntoIterator<Item = &'c Constraint>,
{
    let mut summary = RenderSummary::default();
    for constraint in constraints {
        if cancel.load(Ordering::Relaxed) {
            tracing::info!(rendered = summary.rendered, "rendering cancelled");
            summary.cancelled = true;
            break;
        }
        match renderer.render(Some(constraint)) {
            Ok(()) => summary.rendered += 1,
            Err(RenderError::UnsupportedConstraintKind { kind, .. }) => {
                *summary.unsupported.entry(kind).or_insert(0) += 1;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(summary)
}

//! Explicit list of engine configurations.
//!
//! Cross-validation runs every variant returned by [`variants`] against
//! [`SequentialEngine`] and expects identical scripts.

use super::{
    BoundedWindowEngine, DiffEngine, EditCosts, EditOperation, ForwardPass, SequentialEngine,
    Symbol, WavefrontConfig, WavefrontEngine,
};
use crate::cs::error::Result;

/// Worker counts exercised by [`variants`].
pub const WORKER_COUNTS: [usize; 4] = [1, 2, 4, 8];

/// Operation-window heights exercised by [`variants`], besides the full window.
pub const WINDOW_ROWS: [usize; 3] = [16, 64, 256];

/// Any of the edit-script engines.
#[derive(Debug, Clone)]
pub enum Engine {
    Sequential(SequentialEngine),
    Wavefront(WavefrontEngine),
    BoundedWindow(BoundedWindowEngine),
}

impl DiffEngine for Engine {
    fn compute<T: Symbol>(
        &self,
        source: Option<&[T]>,
        target: Option<&[T]>,
        costs: EditCosts,
    ) -> Result<Vec<EditOperation<T>>> {
        match self {
            Engine::Sequential(engine) => engine.compute(source, target, costs),
            Engine::Wavefront(engine) => engine.compute(source, target, costs),
            Engine::BoundedWindow(engine) => engine.compute(source, target, costs),
        }
    }
}

impl From<SequentialEngine> for Engine {
    fn from(engine: SequentialEngine) -> Self {
        Engine::Sequential(engine)
    }
}

impl From<WavefrontEngine> for Engine {
    fn from(engine: WavefrontEngine) -> Self {
        Engine::Wavefront(engine)
    }
}

impl From<BoundedWindowEngine> for Engine {
    fn from(engine: BoundedWindowEngine) -> Self {
        Engine::BoundedWindow(engine)
    }
}

/// An engine with a human-readable description of its configuration.
#[derive(Debug, Clone)]
pub struct NamedEngine {
    pub name: String,
    pub engine: Engine,
}

impl NamedEngine {
    fn new(name: String, engine: impl Into<Engine>) -> Self {
        Self {
            name,
            engine: engine.into(),
        }
    }
}

/// Every engine configuration: sequential, wavefront over
/// [`WORKER_COUNTS`], and bounded windows over [`WINDOW_ROWS`] with the
/// sequential forward pass and a wavefront pass of every worker count.
pub fn variants() -> Result<Vec<NamedEngine>> {
    variants_for(&WORKER_COUNTS, &WINDOW_ROWS, WavefrontConfig::default())
}

/// Like [`variants`] with explicit worker counts and window heights.
///
/// `base` supplies everything but the worker count of the wavefront
/// variants. Bounded windows share the wavefront pools of the unbounded
/// variants.
pub fn variants_for(
    workers: &[usize],
    windows: &[usize],
    base: WavefrontConfig,
) -> Result<Vec<NamedEngine>> {
    let wavefronts = workers
        .iter()
        .map(|&count| WavefrontEngine::new(base.clone().with_workers(count)))
        .collect::<Result<Vec<_>>>()?;

    let mut out = vec![NamedEngine::new("sequential".to_string(), SequentialEngine)];
    for (count, engine) in workers.iter().zip(&wavefronts) {
        out.push(NamedEngine::new(format!("wavefront/{count}"), engine.clone()));
    }

    for &rows in windows {
        out.push(NamedEngine::new(
            format!("bounded/{rows}"),
            BoundedWindowEngine::new(rows)?,
        ));
        for (count, engine) in workers.iter().zip(&wavefronts) {
            out.push(NamedEngine::new(
                format!("bounded/{rows}/wavefront/{count}"),
                BoundedWindowEngine::new(rows)?
                    .with_forward_pass(ForwardPass::Wavefront(engine.clone())),
            ));
        }
    }

    Ok(out)
}

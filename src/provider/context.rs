//! Resolution context: the stack of identifiers under construction, and the
//! wait-for graph a shared scope keeps between concurrent resolutions.

use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

use crate::error::{DiError, DiResult};
use crate::internal::FastMap;
use crate::key::ServiceId;

/// Deepest chain of nested constructions a single resolution may open.
pub(crate) const MAX_DEPTH: usize = 128;

static NEXT_RESOLUTION: AtomicU64 = AtomicU64::new(0);

/// Per-request stack of the services currently being built.
///
/// A fresh context is created for every outermost lookup and threaded through
/// the recursive resolution of its dependencies. Revisiting an identifier that
/// is still on the stack is a dependency cycle.
#[derive(Debug)]
pub(crate) struct ResolutionContext {
    token: u64,
    stack: SmallVec<[ServiceId; 8]>,
}

impl ResolutionContext {
    pub(crate) fn new() -> Self {
        ResolutionContext {
            token: NEXT_RESOLUTION.fetch_add(1, Ordering::Relaxed),
            stack: SmallVec::new(),
        }
    }

    /// Fails with the full cycle path when `id` is already being built.
    pub(crate) fn check(&self, id: &str) -> DiResult<()> {
        if !self.stack.iter().any(|entry| entry == id) {
            return Ok(());
        }
        let mut path: Vec<ServiceId> = self.stack.iter().cloned().collect();
        path.push(ServiceId::from(id));
        Err(DiError::CircularDependency(path))
    }

    pub(crate) fn enter(&mut self, id: &ServiceId) -> DiResult<()> {
        self.check(id)?;
        if self.stack.len() >= MAX_DEPTH {
            return Err(DiError::DepthExceeded(MAX_DEPTH));
        }
        self.stack.push(id.clone());
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.stack.pop();
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Which resolution is building each singleton of a scope, and which
/// singleton each blocked resolution waits for.
///
/// A resolution about to block on a cell another resolution is building
/// follows the chain of owners and waits. Reaching itself again means both
/// would block forever, so it fails with the cycle instead.
#[derive(Debug, Default)]
pub(crate) struct WaitGraph {
    building: FastMap<ServiceId, u64>,
    waiting: FastMap<u64, ServiceId>,
}

impl WaitGraph {
    /// Records that `ctx` is about to wait for `id`.
    pub(crate) fn wait_for(&mut self, ctx: &ResolutionContext, id: &ServiceId) -> DiResult<()> {
        let mut chain = vec![id.clone()];
        let mut current = id;
        // Every hop passes through a distinct waiting resolution.
        for _ in 0..=self.waiting.len() {
            let owner = match self.building.get(current) {
                Some(owner) => *owner,
                None => break,
            };
            if owner == ctx.token {
                let mut path: Vec<ServiceId> = ctx.stack.iter().cloned().collect();
                path.extend(chain);
                return Err(DiError::CircularDependency(path));
            }
            match self.waiting.get(&owner) {
                Some(next) => {
                    chain.push(next.clone());
                    current = next;
                }
                None => break,
            }
        }
        self.waiting.insert(ctx.token, id.clone());
        Ok(())
    }

    pub(crate) fn stop_waiting(&mut self, ctx: &ResolutionContext) {
        self.waiting.remove(&ctx.token);
    }

    /// `ctx` won the race for `id` and now builds it instead of waiting.
    pub(crate) fn start_building(&mut self, ctx: &ResolutionContext, id: &ServiceId) {
        self.waiting.remove(&ctx.token);
        self.building.insert(id.clone(), ctx.token);
    }

    pub(crate) fn finish_building(&mut self, id: &ServiceId) {
        self.building.remove(id);
    }
}

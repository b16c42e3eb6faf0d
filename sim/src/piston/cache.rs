//! Active pistons of a session.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{debug, trace, warn};
use world::{BlockPos, Direction};

use super::action::PistonAction;
use super::simulator::PistonSimulator;
use crate::context::SimContext;
use crate::driver::{self, StopReason, TickHandle};

/// In-flight piston simulators keyed by piston base position.
///
/// Each simulator runs on its own tick driver and removes itself once it
/// settles. Cloning shares the same set.
#[derive(Debug, Clone)]
pub struct PistonCache {
    inner: Arc<CacheInner>,
}

#[derive(Debug)]
struct CacheInner {
    ctx: SimContext,
    active: Mutex<HashMap<BlockPos, Active>>,
    next_serial: AtomicU64,
}

#[derive(Debug)]
struct Active {
    serial: u64,
    handle: TickHandle<PistonAction>,
}

impl CacheInner {
    fn lock(&self) -> MutexGuard<'_, HashMap<BlockPos, Active>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PistonCache {
    #[must_use]
    pub fn new(ctx: SimContext) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                ctx,
                active: Mutex::new(HashMap::new()),
                next_serial: AtomicU64::new(0),
            }),
        }
    }

    /// Number of pistons in motion.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    #[must_use]
    pub fn contains(&self, position: BlockPos) -> bool {
        self.inner.lock().contains_key(&position)
    }

    /// Routes a piston action to the simulator at `position`, starting one
    /// when none is running.
    ///
    /// # Panics
    ///
    /// Panics when a simulator has to be started outside a tokio runtime.
    pub fn handle(&self, position: BlockPos, orientation: Direction, action: PistonAction) {
        let mut active = self.inner.lock();
        if let Some(entry) = active.get(&position) {
            if entry.handle.send(action).is_ok() {
                trace!(?position, ?action, "piston action routed");
                return;
            }
            trace!(?position, "piston driver closed, starting a new one");
        }

        let serial = self.inner.next_serial.fetch_add(1, Ordering::Relaxed);
        let registration = Registration {
            cache: Arc::downgrade(&self.inner),
            position,
            orientation,
            serial,
        };
        let simulator = PistonSimulator::new(self.inner.ctx.clone(), position, orientation)
            .with_registration(registration);
        let handle = driver::spawn(simulator, self.inner.ctx.config.tick_interval());
        if let Err(err) = handle.send(action) {
            warn!(?position, error = %err, "new piston driver refused its action");
        }
        debug!(?position, serial, "piston started");
        active.insert(position, Active { serial, handle });
    }

    /// Stops every simulator.
    pub fn clear(&self) {
        let drained: Vec<Active> = self.inner.lock().drain().map(|(_, a)| a).collect();
        for entry in &drained {
            entry.handle.cancel();
        }
    }
}

/// A simulator's claim on its cache entry.
#[derive(Debug)]
pub(crate) struct Registration {
    cache: Weak<CacheInner>,
    position: BlockPos,
    orientation: Direction,
    serial: u64,
}

impl Registration {
    /// Drops the cache entry if it still belongs to this simulator.
    ///
    /// Actions that reached a finished simulator after it settled are handed
    /// to a fresh one.
    pub(crate) fn release(self, reason: StopReason, leftovers: Vec<PistonAction>) {
        let Some(inner) = self.cache.upgrade() else {
            return;
        };
        {
            let mut active = inner.lock();
            if active
                .get(&self.position)
                .is_some_and(|entry| entry.serial == self.serial)
            {
                active.remove(&self.position);
            }
        }
        if reason != StopReason::Finished || leftovers.is_empty() {
            return;
        }
        debug!(
            position = ?self.position,
            count = leftovers.len(),
            "re-dispatching actions that raced with settling"
        );
        let cache = PistonCache { inner };
        for action in leftovers {
            cache.handle(self.position, self.orientation, action);
        }
    }
}

//! Single-camera slot with start tickets
//!
//! Acquiring a camera is async, so a start can overlap another start or a
//! stop. `begin()` hands out a ticket tied to the current generation; `stop()`
//! bumps the generation, which turns any in-flight ticket stale. A camera that
//! arrives on a stale ticket is stopped on the spot instead of being installed.

/// Anything holding live capture hardware
pub trait MediaSource {
    fn stop(&self);
}

/// Proof of a start request, checked when acquisition resolves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartTicket(u64);

pub struct CameraSlot<C: MediaSource> {
    active: Option<C>,
    pending: Option<StartTicket>,
    generation: u64,
}

impl<C: MediaSource> Default for CameraSlot<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: MediaSource> CameraSlot<C> {
    pub const fn new() -> Self {
        Self {
            active: None,
            pending: None,
            generation: 0,
        }
    }

    /// Claim the slot for a start. `None` while a camera is running or another
    /// start is in flight.
    pub fn begin(&mut self) -> Option<StartTicket> {
        if self.active.is_some() || self.pending.is_some() {
            return None;
        }
        let ticket = StartTicket(self.generation);
        self.pending = Some(ticket);
        Some(ticket)
    }

    /// Install an acquired camera. Returns false, after stopping `camera`, when
    /// the ticket went stale in the meantime.
    pub fn finish(&mut self, ticket: StartTicket, camera: C) -> bool {
        if self.pending != Some(ticket) {
            log::info!("Camera acquired after a stop, releasing it");
            camera.stop();
            return false;
        }
        self.pending = None;
        if let Some(previous) = self.active.replace(camera) {
            previous.stop();
        }
        true
    }

    /// Acquisition failed. Returns whether the failure still matters, i.e. the
    /// ticket was not superseded by a stop.
    pub fn fail(&mut self, ticket: StartTicket) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.pending = None;
        true
    }

    /// Release the running camera and invalidate any start in flight.
    /// Returns whether there was anything to stop.
    pub fn stop(&mut self) -> bool {
        self.generation += 1;
        let had_pending = self.pending.take().is_some();
        match self.active.take() {
            Some(camera) => {
                camera.stop();
                true
            }
            None => had_pending,
        }
    }

    pub fn active(&self) -> Option<&C> {
        self.active.as_ref()
    }

    pub fn is_starting(&self) -> bool {
        self.pending.is_some()
    }
}

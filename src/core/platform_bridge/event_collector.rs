//=========================================================================
// Event Collector
//=========================================================================
//
// Channel-fed host event collection with bounded draining.
//
// Architecture:
//   Sender<HostEvent> ──> Receiver<HostEvent> → poll()/wait() → events
//                                                     └─> TickControl
//
// Used by surfaces whose events come from another owner (scripted input,
// embedding applications) rather than from a native window system.
// Bounded draining keeps a flooding producer from starving the loop.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, RecvError, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::input::KeyInput;

//=== TickControl =========================================================

/// Loop control signal: keep going or shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== HostEvent ===========================================================

/// Events a host feeds into a channel-driven surface.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Cursor moved to an absolute position (pixels, top-left origin).
    CursorMoved { x: f64, y: f64 },

    /// Keyboard press, repeat or release.
    Key(KeyInput),

    /// Surface resized.
    Resized { width: u32, height: u32 },

    /// Close requested by the host.
    CloseRequested,
}

//=== EventCollector ======================================================

/// Collects host events with bounded polling and shutdown detection.
pub(crate) struct EventCollector {
    receiver: Receiver<HostEvent>,
    events: Vec<HostEvent>,
}

impl EventCollector {
    const MAX_EVENTS_PER_PUMP: usize = 256;

    pub(crate) fn new(receiver: Receiver<HostEvent>) -> Self {
        Self {
            receiver,
            events: Vec::with_capacity(16),
        }
    }

    /// Drains pending events without blocking.
    ///
    /// Returns `Exit` once every sender is gone.
    pub(crate) fn poll(&mut self) -> TickControl {
        self.events.clear();
        self.drain()
    }

    /// Blocks for the first event, then drains whatever else is pending.
    pub(crate) fn wait(&mut self) -> TickControl {
        self.events.clear();

        match self.receiver.recv() {
            Ok(event) => self.events.push(event),
            Err(RecvError) => return TickControl::Exit,
        }

        self.drain()
    }

    /// Takes the events collected by the last `poll`/`wait`.
    pub(crate) fn take_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    //--- Internal Helpers -------------------------------------------------

    fn drain(&mut self) -> TickControl {
        let mut drained = 0;

        while drained < Self::MAX_EVENTS_PER_PUMP {
            match self.receiver.try_recv() {
                Ok(event) => {
                    self.events.push(event);
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_EVENTS_PER_PUMP {
            warn!(target: "platform", "Event queue backlog: drained {} events this pump", drained);
        }

        TickControl::Continue
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

//! Recording transport for tests and simulations.
//!
//! [`MockTransport`] behaves like a controller that never produces reports on
//! its own: callers inject them with [`MockTransport::emit_report`].  Every
//! push and lifecycle call is recorded for later assertions.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Mutex;

use glint_core::Color;

use super::{ConnectionMedium, HardwareReport, LightState, LightingTransport, TransportError};

/// A mock implementation of [`LightingTransport`].
pub struct MockTransport {
    identity: String,
    medium: ConnectionMedium,
    initial_color: Color,
    sender: Mutex<Option<Sender<HardwareReport>>>,
    pushes: Mutex<Vec<LightState>>,
    fail_pushes: AtomicBool,
    disconnecting: AtomicBool,
    updating: AtomicBool,
    stop_update_calls: AtomicUsize,
    bluetooth_disconnects: AtomicUsize,
    dongle_disconnects: AtomicUsize,
}

impl MockTransport {
    pub fn new(identity: impl Into<String>, medium: ConnectionMedium, initial_color: Color) -> Self {
        Self {
            identity: identity.into(),
            medium,
            initial_color,
            sender: Mutex::new(None),
            pushes: Mutex::new(Vec::new()),
            fail_pushes: AtomicBool::new(false),
            disconnecting: AtomicBool::new(false),
            updating: AtomicBool::new(false),
            stop_update_calls: AtomicUsize::new(0),
            bluetooth_disconnects: AtomicUsize::new(0),
            dongle_disconnects: AtomicUsize::new(0),
        }
    }

    /// A USB controller currently showing `initial_color`.
    pub fn usb(identity: impl Into<String>, initial_color: Color) -> Self {
        Self::new(identity, ConnectionMedium::Usb, initial_color)
    }

    /// Delivers a report as if the controller produced it.
    ///
    /// Returns `false` when nobody is subscribed.
    pub fn emit_report(&self, report: HardwareReport) -> bool {
        let guard = self.sender.lock().expect("lock poisoned");
        match guard.as_ref() {
            Some(sender) => sender.send(report).is_ok(),
            None => false,
        }
    }

    /// Every successful push, oldest first.
    pub fn pushes(&self) -> Vec<LightState> {
        self.pushes.lock().expect("lock poisoned").clone()
    }

    pub fn last_push(&self) -> Option<LightState> {
        self.pushes.lock().expect("lock poisoned").last().copied()
    }

    pub fn push_count(&self) -> usize {
        self.pushes.lock().expect("lock poisoned").len()
    }

    /// Makes every subsequent push fail with [`TransportError::Disconnected`].
    pub fn set_fail_pushes(&self, fail: bool) {
        self.fail_pushes.store(fail, Ordering::SeqCst);
    }

    pub fn set_disconnecting(&self, disconnecting: bool) {
        self.disconnecting.store(disconnecting, Ordering::SeqCst);
    }

    pub fn is_subscribed(&self) -> bool {
        self.sender.lock().expect("lock poisoned").is_some()
    }

    pub fn is_updating(&self) -> bool {
        self.updating.load(Ordering::SeqCst)
    }

    pub fn stop_update_calls(&self) -> usize {
        self.stop_update_calls.load(Ordering::SeqCst)
    }

    pub fn bluetooth_disconnects(&self) -> usize {
        self.bluetooth_disconnects.load(Ordering::SeqCst)
    }

    pub fn dongle_disconnects(&self) -> usize {
        self.dongle_disconnects.load(Ordering::SeqCst)
    }
}

impl LightingTransport for MockTransport {
    fn identity(&self) -> String {
        self.identity.clone()
    }

    fn medium(&self) -> ConnectionMedium {
        self.medium
    }

    fn current_color(&self) -> Color {
        self.initial_color
    }

    fn start_update(&self) -> Result<(), TransportError> {
        self.updating.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop_update(&self) {
        self.updating.store(false, Ordering::SeqCst);
        self.stop_update_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn subscribe_reports(&self) -> Result<mpsc::Receiver<HardwareReport>, TransportError> {
        let (tx, rx) = mpsc::channel();
        *self.sender.lock().expect("lock poisoned") = Some(tx);
        Ok(rx)
    }

    fn unsubscribe_reports(&self) {
        // Drop the sender to close the channel
        *self.sender.lock().expect("lock poisoned") = None;
    }

    fn push_light_state(&self, state: LightState) -> Result<(), TransportError> {
        if self.fail_pushes.load(Ordering::SeqCst) {
            return Err(TransportError::Disconnected);
        }
        self.pushes.lock().expect("lock poisoned").push(state);
        Ok(())
    }

    fn disconnect_bluetooth(&self) {
        self.bluetooth_disconnects.fetch_add(1, Ordering::SeqCst);
    }

    fn disconnect_dongle(&self) {
        self.dongle_disconnects.fetch_add(1, Ordering::SeqCst);
    }

    fn is_disconnecting(&self) -> bool {
        self.disconnecting.load(Ordering::SeqCst)
    }
}

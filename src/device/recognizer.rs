//! Request recognizer for the inbound byte stream.
//!
//! Accumulates bytes into a fixed receive window. When the window is full it
//! is scanned once for the request marker and then emptied, whatever the
//! outcome. A marker split across two windows is therefore never seen.
//!
//! This is a pure state machine: arming, flags and actuator state live in
//! [`Device`](super::Device).

use core::marker::PhantomData;

use crate::config::{DefaultConfig, DeviceConfig, RX_WINDOW_SIZE};

/// Actuator change requested by a matched request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorCommand {
    /// Switch the actuator on
    On,
    /// Switch the actuator off
    Off,
    /// Leave the actuator as it is
    Unchanged,
}

impl ActuatorCommand {
    /// Map a command byte using the configured on/off bytes.
    pub fn from_byte<C: DeviceConfig>(byte: Option<u8>) -> Self {
        match byte {
            Some(b) if b == C::ACTUATOR_ON => ActuatorCommand::On,
            Some(b) if b == C::ACTUATOR_OFF => ActuatorCommand::Off,
            _ => ActuatorCommand::Unchanged,
        }
    }

    /// New actuator state given the current one.
    pub fn apply(self, current: bool) -> bool {
        match self {
            ActuatorCommand::On => true,
            ActuatorCommand::Off => false,
            ActuatorCommand::Unchanged => current,
        }
    }
}

/// A request marker found in a full window.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RequestMatch {
    /// Window index of the first marker byte
    pub position: usize,
    /// Command decoded from the byte at `position + COMMAND_OFFSET`
    pub command: ActuatorCommand,
}

/// Outcome of feeding one byte to the recognizer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Scan {
    /// Window not full yet
    Filling,
    /// Window was full and contained the marker
    Matched(RequestMatch),
    /// Window was full without a marker and has been reset
    Discarded,
}

/// Receive window plus marker scan.
///
/// `N` is the window size. It should be at least the marker length plus the
/// command offset, otherwise a marker at the window start has its command
/// byte cut off and decodes as [`ActuatorCommand::Unchanged`].
#[derive(Debug)]
pub struct RequestRecognizer<C: DeviceConfig = DefaultConfig, const N: usize = RX_WINDOW_SIZE> {
    window: heapless::Vec<u8, N>,
    _config: PhantomData<C>,
}

impl<C: DeviceConfig, const N: usize> RequestRecognizer<C, N> {
    /// Create a recognizer with an empty window.
    pub const fn new() -> Self {
        Self {
            window: heapless::Vec::new(),
            _config: PhantomData,
        }
    }

    /// Append one byte. Scans and resets the window when it becomes full.
    pub fn push(&mut self, byte: u8) -> Scan {
        if self.window.push(byte).is_err() {
            // Only reachable with N == 0
            return Scan::Discarded;
        }
        if !self.window.is_full() {
            return Scan::Filling;
        }

        let result = match Self::scan(&self.window) {
            Some(found) => Scan::Matched(found),
            None => Scan::Discarded,
        };
        self.window.clear();
        result
    }

    /// Find the first marker in `window` and decode its command byte.
    pub fn scan(window: &[u8]) -> Option<RequestMatch> {
        let marker = C::REQUEST_MARKER;
        if marker.is_empty() {
            return None;
        }
        let position = window.windows(marker.len()).position(|w| w == marker)?;
        let command = ActuatorCommand::from_byte::<C>(window.get(position + C::COMMAND_OFFSET).copied());
        Some(RequestMatch { position, command })
    }

    /// Drop any partially filled window.
    pub fn reset(&mut self) {
        self.window.clear();
    }

    /// Bytes currently buffered.
    pub fn buffered(&self) -> &[u8] {
        &self.window
    }

    /// Window size.
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<C: DeviceConfig, const N: usize> Default for RequestRecognizer<C, N> {
    fn default() -> Self {
        Self::new()
    }
}

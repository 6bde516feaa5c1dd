//! Shared device state and the interrupt entry points.
//!
//! A [`Device`] owns everything the interrupt handlers and the background
//! scheduler share: the pending-work flags, the actuator and receive-armed
//! gates, the receive window, the clock with its sample history, and the
//! temperature sensor. It is const-constructible so firmware can place it in
//! a `static`.
//!
//! Interrupt context calls [`Device::on_byte_received()`] and
//! [`Device::on_tick()`]. Neither blocks on I/O. Background context reads
//! through [`Device::snapshot()`], which takes the clock and history under
//! one critical section so it never observes a half-applied tick.
//!
//! Single-word state uses `portable_atomic`. Multi-field state lives in
//! `critical_section::Mutex<RefCell<_>>` cells.

use core::cell::RefCell;

use critical_section::Mutex;
use portable_atomic::{AtomicBool, AtomicU16, Ordering};

use crate::config::{DefaultConfig, DeviceConfig, HISTORY_CAPACITY, RX_WINDOW_SIZE};
use crate::sensor::TemperatureSensor;

pub mod clock;
pub mod history;
pub mod pending;
pub mod recognizer;

pub use clock::{CalendarDate, Clock, Rollover};
pub use history::SampleHistory;
pub use pending::{PendingWork, RESPONSE_DUE};
pub use recognizer::{ActuatorCommand, RequestMatch, RequestRecognizer, Scan};

/// Counters for input the device dropped without reporting it to the peer.
#[derive(Debug)]
pub struct DropStats {
    windows_discarded: AtomicU16,
    bytes_ignored: AtomicU16,
}

impl DropStats {
    /// Create zeroed counters.
    pub const fn new() -> Self {
        Self {
            windows_discarded: AtomicU16::new(0),
            bytes_ignored: AtomicU16::new(0),
        }
    }

    /// Full receive windows that held no request marker.
    pub fn windows_discarded(&self) -> u16 {
        self.windows_discarded.load(Ordering::Relaxed)
    }

    /// Bytes that arrived while the receive path was disarmed.
    pub fn bytes_ignored(&self) -> u16 {
        self.bytes_ignored.load(Ordering::Relaxed)
    }

    fn record_discarded(&self) {
        self.windows_discarded.fetch_add(1, Ordering::Relaxed);
    }

    fn record_ignored(&self) {
        self.bytes_ignored.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for DropStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Consistent copy of the tick-owned state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Clock at the time of the snapshot
    pub clock: Clock,
    /// History slots in storage order
    pub samples: [i16; HISTORY_CAPACITY],
    /// History write cursor
    pub cursor: usize,
}

#[derive(Debug)]
struct Timebase {
    clock: Clock,
    history: SampleHistory<HISTORY_CAPACITY>,
}

/// State shared between the interrupt handlers and the scheduler.
///
/// Generic over:
/// - `S`: Temperature sensor
/// - `C`: Request and rendering configuration (defaults to `DefaultConfig`)
#[derive(Debug)]
pub struct Device<S: TemperatureSensor, C: DeviceConfig = DefaultConfig> {
    pending: PendingWork,
    actuator: AtomicBool,
    receive_armed: AtomicBool,
    stats: DropStats,
    receiver: Mutex<RefCell<RequestRecognizer<C, RX_WINDOW_SIZE>>>,
    timebase: Mutex<RefCell<Timebase>>,
    sensor: Mutex<RefCell<S>>,
}

impl<S: TemperatureSensor, C: DeviceConfig> Device<S, C> {
    /// Create a device starting at 00:00:00 with the receive path armed.
    pub const fn new(sensor: S) -> Self {
        Self::with_clock(sensor, Clock::MIDNIGHT)
    }

    /// Create a device starting at `clock`.
    pub const fn with_clock(sensor: S, clock: Clock) -> Self {
        Self {
            pending: PendingWork::new(),
            actuator: AtomicBool::new(false),
            receive_armed: AtomicBool::new(true),
            stats: DropStats::new(),
            receiver: Mutex::new(RefCell::new(RequestRecognizer::new())),
            timebase: Mutex::new(RefCell::new(Timebase {
                clock,
                history: SampleHistory::new(),
            })),
            sensor: Mutex::new(RefCell::new(sensor)),
        }
    }

    // ========================================
    // Interrupt context
    // ========================================

    /// Byte-received interrupt.
    ///
    /// Appends the byte to the receive window. On a request match the
    /// receive path is disarmed, the actuator command is applied and
    /// `RESPONSE_DUE` is raised.
    ///
    /// Returns true when the scheduler must leave its low-power wait.
    pub fn on_byte_received(&self, byte: u8) -> bool {
        if !self.receive_armed.load(Ordering::Acquire) {
            self.stats.record_ignored();
            debug!("byte ignored while disarmed: {=u8}", byte);
            return false;
        }

        let scan = critical_section::with(|cs| self.receiver.borrow_ref_mut(cs).push(byte));

        match scan {
            Scan::Filling => false,
            Scan::Discarded => {
                self.stats.record_discarded();
                debug!("receive window discarded");
                false
            }
            Scan::Matched(found) => {
                self.receive_armed.store(false, Ordering::Release);
                match found.command {
                    ActuatorCommand::On => self.actuator.store(true, Ordering::Release),
                    ActuatorCommand::Off => self.actuator.store(false, Ordering::Release),
                    ActuatorCommand::Unchanged => {}
                }
                self.pending.raise(RESPONSE_DUE);
                info!("request accepted at {=usize}", found.position);
                true
            }
        }
    }

    /// Periodic one-second tick interrupt.
    ///
    /// On a minute rollover one reading is taken and appended to the
    /// history; on an hour rollover the history cursor restarts at slot 0.
    /// The conversion runs inside the critical section.
    pub fn on_tick(&self) -> Rollover {
        critical_section::with(|cs| {
            let mut timebase = self.timebase.borrow_ref_mut(cs);
            let rollover = timebase.clock.tick();

            if rollover >= Rollover::Minute {
                let sample = self.sensor.borrow_ref_mut(cs).read_temperature();
                timebase.history.append(sample);
            }
            if rollover >= Rollover::Hour {
                timebase.history.restart();
            }

            rollover
        })
    }

    // ========================================
    // Background context
    // ========================================

    /// Take the clock and history in one critical section.
    pub fn snapshot(&self) -> Snapshot {
        critical_section::with(|cs| {
            let timebase = self.timebase.borrow_ref(cs);
            Snapshot {
                clock: timebase.clock,
                samples: timebase.history.snapshot(),
                cursor: timebase.history.cursor(),
            }
        })
    }

    /// Current clock.
    pub fn clock(&self) -> Clock {
        critical_section::with(|cs| self.timebase.borrow_ref(cs).clock)
    }

    /// Take a fresh temperature reading.
    pub fn read_temperature(&self) -> i16 {
        critical_section::with(|cs| self.sensor.borrow_ref_mut(cs).read_temperature())
    }

    /// Finish a dispatch cycle: clear `RESPONSE_DUE`, then re-arm receive.
    ///
    /// Returns false if no response was pending.
    pub fn complete_dispatch(&self) -> bool {
        let was_pending = self.pending.clear(RESPONSE_DUE);
        self.receive_armed.store(true, Ordering::Release);
        was_pending
    }

    /// Run `f` with exclusive access to the sensor.
    pub fn with_sensor<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        critical_section::with(|cs| f(&mut self.sensor.borrow_ref_mut(cs)))
    }

    /// Pending-work flags.
    pub fn pending(&self) -> &PendingWork {
        &self.pending
    }

    /// Last commanded actuator state.
    pub fn actuator_on(&self) -> bool {
        self.actuator.load(Ordering::Acquire)
    }

    /// Whether the receive path accepts bytes.
    pub fn is_receive_armed(&self) -> bool {
        self.receive_armed.load(Ordering::Acquire)
    }

    /// Drop counters.
    pub fn stats(&self) -> &DropStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sensor returning an incrementing reading.
    struct Counter(i16);

    impl TemperatureSensor for Counter {
        fn read_temperature(&mut self) -> i16 {
            self.0 += 1;
            self.0
        }
    }

    fn deliver(device: &Device<Counter>, bytes: &[u8]) -> bool {
        let mut woke = false;
        for &b in bytes {
            woke |= device.on_byte_received(b);
        }
        woke
    }

    #[test]
    fn test_request_raises_pending_and_disarms() {
        let device: Device<Counter> = Device::new(Counter(0));
        assert!(deliver(&device, b"GET /?3=EIN HTT"));
        assert!(device.pending().is_raised(RESPONSE_DUE));
        assert!(device.actuator_on());
        assert!(!device.is_receive_armed());
    }

    #[test]
    fn test_disarmed_bytes_are_counted() {
        let device: Device<Counter> = Device::new(Counter(0));
        deliver(&device, b"GET /?3=EIN HTT");
        assert!(!deliver(&device, b"GET /?3=AUS HTT"));
        assert_eq!(device.stats().bytes_ignored(), 15);
        // Second request never reached the recognizer
        assert!(device.actuator_on());
    }

    #[test]
    fn test_complete_dispatch_rearms() {
        let device: Device<Counter> = Device::new(Counter(0));
        deliver(&device, b"GET /?3=EIN HTT");
        assert!(device.complete_dispatch());
        assert!(device.pending().is_empty());
        assert!(device.is_receive_armed());
        assert!(!device.complete_dispatch());

        assert!(deliver(&device, b"GET /?3=AUS HTT"));
        assert!(!device.actuator_on());
    }

    #[test]
    fn test_discarded_window_is_counted() {
        let device: Device<Counter> = Device::new(Counter(0));
        assert!(!deliver(&device, b"no request here"));
        assert_eq!(device.stats().windows_discarded(), 1);
        assert!(device.pending().is_empty());
    }

    #[test]
    fn test_tick_samples_on_minute() {
        let device: Device<Counter> = Device::with_clock(Counter(20), Clock::new(0, 0, 58));
        assert_eq!(device.on_tick(), Rollover::None);
        assert_eq!(device.on_tick(), Rollover::Minute);

        let snapshot = device.snapshot();
        assert_eq!(snapshot.samples[0], 21);
        assert_eq!(snapshot.cursor, 1);
        assert_eq!((snapshot.clock.minute, snapshot.clock.second), (1, 0));
    }

    #[test]
    fn test_hour_rollover_restarts_cursor() {
        let device: Device<Counter> = Device::with_clock(Counter(0), Clock::new(0, 58, 59));
        device.on_tick();
        assert_eq!(device.snapshot().cursor, 1);
        for _ in 0..60 {
            device.on_tick();
        }
        let snapshot = device.snapshot();
        assert_eq!(snapshot.clock, Clock::new(1, 0, 0));
        // Two samples were written, then the cursor restarted
        assert_eq!(&snapshot.samples[..2], &[1, 2]);
        assert_eq!(snapshot.cursor, 0);
    }

    #[test]
    fn test_fresh_reading() {
        let device: Device<Counter> = Device::new(Counter(5));
        assert_eq!(device.read_temperature(), 6);
        assert_eq!(device.with_sensor(|s| s.0), 6);
    }
}

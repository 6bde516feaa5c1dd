//! Power-state scheduler.
//!
//! The background control loop. It sleeps until an interrupt raises pending
//! work, then dispatches: applies the actuator state, renders the response
//! and drains it through the transport, clears the flag and re-arms the
//! receive path. It never terminates.
//!
//! ```text
//!              pending work raised
//!  IdleSleep ----------------------> Dispatch
//!      ^                                |
//!      +--------------------------------+
//!        response sent, flag cleared
//! ```

use crate::config::{DefaultConfig, DeviceConfig};
use crate::device::{Device, PendingWork};
use crate::io::Transport;
use crate::response::{PageTemplate, PageView, ResponseGenerator};
use crate::sensor::TemperatureSensor;

/// Scheduler state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Low-power wait with interrupts enabled
    IdleSleep,
    /// Generating and transmitting a response
    Dispatch,
}

/// Platform services the scheduler depends on.
pub trait Platform {
    /// One-time peripheral setup before the loop starts.
    fn init(&mut self) {}

    /// Enter the low-power wait until the next enabled interrupt.
    ///
    /// Called after the scheduler saw `pending` empty. An interrupt may raise
    /// work before the wait starts, so implementations re-check `pending`
    /// with interrupts masked and only then wait. On Cortex-M, WFI inside
    /// `interrupt::free` still wakes on the masked interrupt. Skipping the
    /// re-check delays such a request until the next interrupt (at most one
    /// tick).
    fn sleep_until_interrupt(&mut self, pending: &PendingWork);

    /// Drive the actuator output.
    fn set_actuator(&mut self, _on: bool) {}
}

/// Background scheduler.
///
/// Generic over:
/// - `'d`: Lifetime of the shared device (typically `'static`)
/// - `S`: Temperature sensor
/// - `T`: Transport implementation
/// - `P`: Page template
/// - `W`: Platform implementation
/// - `C`: DeviceConfig implementation
pub struct Scheduler<'d, S, T, P, W, C = DefaultConfig>
where
    S: TemperatureSensor,
    T: Transport,
    P: PageTemplate,
    W: Platform,
    C: DeviceConfig,
{
    device: &'d Device<S, C>,
    transport: T,
    page: P,
    platform: W,
    state: PowerState,
    dispatches: u32,
}

impl<'d, S, T, P, W, C> core::fmt::Debug for Scheduler<'d, S, T, P, W, C>
where
    S: TemperatureSensor,
    T: Transport,
    P: PageTemplate,
    W: Platform,
    C: DeviceConfig,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scheduler")
            .field("state", &self.state)
            .field("dispatches", &self.dispatches)
            .finish()
    }
}

impl<'d, S, T, P, W, C> Scheduler<'d, S, T, P, W, C>
where
    S: TemperatureSensor,
    T: Transport,
    P: PageTemplate,
    W: Platform,
    C: DeviceConfig,
{
    /// Create a scheduler in `IdleSleep`.
    pub fn new(device: &'d Device<S, C>, transport: T, page: P, platform: W) -> Self {
        Self {
            device,
            transport,
            page,
            platform,
            state: PowerState::IdleSleep,
            dispatches: 0,
        }
    }

    /// Run platform init and apply the initial actuator state.
    pub fn start(&mut self) {
        self.platform.init();
        self.platform.set_actuator(self.device.actuator_on());
        info!("scheduler started");
    }

    /// Run one scheduler step.
    ///
    /// With no pending work, sleeps until an interrupt and returns
    /// `IdleSleep`. Otherwise performs one dispatch cycle and returns
    /// `Dispatch`. The flag is cleared and receive re-armed even when the
    /// transport fails; the error is then returned.
    pub fn poll(&mut self) -> Result<PowerState, T::Error> {
        if self.device.pending().is_empty() {
            self.state = PowerState::IdleSleep;
            self.platform.sleep_until_interrupt(self.device.pending());
            return Ok(PowerState::IdleSleep);
        }

        self.state = PowerState::Dispatch;
        let result = self.dispatch();
        self.device.complete_dispatch();
        self.dispatches = self.dispatches.wrapping_add(1);
        self.state = PowerState::IdleSleep;

        match result {
            Ok(()) => {
                debug!("dispatch complete");
                Ok(PowerState::Dispatch)
            }
            Err(e) => {
                warn!("transmit failed");
                Err(e)
            }
        }
    }

    /// Start and loop forever. Transport errors are dropped.
    pub fn run(mut self) -> ! {
        self.start();
        loop {
            self.poll().ok();
        }
    }

    fn dispatch(&mut self) -> Result<(), T::Error> {
        let actuator_on = self.device.actuator_on();
        self.platform.set_actuator(actuator_on);

        let temperature = self.device.read_temperature();
        let snapshot = self.device.snapshot();
        let view = PageView::from_snapshot(&snapshot, temperature, actuator_on);

        ResponseGenerator::<C>::generate(&mut self.transport, &self.page, &view)
    }

    /// Current state.
    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Completed dispatch cycles (successful or not).
    pub fn dispatch_count(&self) -> u32 {
        self.dispatches
    }

    /// Shared device.
    pub fn device(&self) -> &'d Device<S, C> {
        self.device
    }

    /// Get mutable reference to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Get mutable reference to the platform.
    pub fn platform_mut(&mut self) -> &mut W {
        &mut self.platform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{Fragment, SeriesStyle};
    extern crate std;
    use std::vec::Vec;

    struct Fixed(i16);

    impl TemperatureSensor for Fixed {
        fn read_temperature(&mut self) -> i16 {
            self.0
        }
    }

    #[derive(Default)]
    struct Sink {
        bytes: Vec<u8>,
        fail: bool,
    }

    impl Transport for Sink {
        type Error = ();

        fn write_byte(&mut self, byte: u8) -> nb::Result<(), ()> {
            if self.fail {
                return Err(nb::Error::Other(()));
            }
            self.bytes.push(byte);
            Ok(())
        }
    }

    #[derive(Default)]
    struct Board {
        sleeps: u32,
        actuator: Option<bool>,
    }

    impl Platform for Board {
        fn sleep_until_interrupt(&mut self, _pending: &PendingWork) {
            self.sleeps += 1;
        }

        fn set_actuator(&mut self, on: bool) {
            self.actuator = Some(on);
        }
    }

    struct Bare;

    impl PageTemplate for Bare {
        fn series_style(&self) -> SeriesStyle {
            SeriesStyle::Index
        }

        fn fragments(&self) -> &[Fragment] {
            &[Fragment::Temperature]
        }

        fn actuator_text(&self, _on: bool) -> &str {
            ""
        }
    }

    fn request(device: &Device<Fixed>) {
        for &b in b"GET /?3=EIN HTT" {
            device.on_byte_received(b);
        }
    }

    #[test]
    fn test_idle_sleeps() {
        let device: Device<Fixed> = Device::new(Fixed(20));
        let mut scheduler = Scheduler::new(&device, Sink::default(), Bare, Board::default());
        assert_eq!(scheduler.poll(), Ok(PowerState::IdleSleep));
        assert_eq!(scheduler.platform_mut().sleeps, 1);
        assert!(scheduler.transport_mut().bytes.is_empty());
    }

    #[test]
    fn test_dispatch_cycle() {
        let device: Device<Fixed> = Device::new(Fixed(20));
        let mut scheduler = Scheduler::new(&device, Sink::default(), Bare, Board::default());
        scheduler.start();
        assert_eq!(scheduler.platform_mut().actuator, Some(false));

        request(&device);
        assert_eq!(scheduler.poll(), Ok(PowerState::Dispatch));
        assert_eq!(scheduler.state(), PowerState::IdleSleep);
        assert_eq!(scheduler.dispatch_count(), 1);
        assert!(device.pending().is_empty());
        assert!(device.is_receive_armed());
        assert_eq!(scheduler.platform_mut().actuator, Some(true));
        assert!(scheduler.transport_mut().bytes.ends_with(b"\r\n\r\n 20"));
        // No sleep while work was pending
        assert_eq!(scheduler.platform_mut().sleeps, 0);
    }

    #[test]
    fn test_transport_failure_still_completes() {
        let device: Device<Fixed> = Device::new(Fixed(20));
        let sink = Sink {
            fail: true,
            ..Default::default()
        };
        let mut scheduler = Scheduler::new(&device, sink, Bare, Board::default());
        request(&device);
        assert_eq!(scheduler.poll(), Err(()));
        assert!(device.pending().is_empty());
        assert!(device.is_receive_armed());
        assert_eq!(scheduler.dispatch_count(), 1);
    }
}

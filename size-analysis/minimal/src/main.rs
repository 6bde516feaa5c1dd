#![no_std]
#![no_main]

use core::convert::Infallible;
use core::hint::black_box;

use cortex_m::peripheral::SYST;
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m_rt::{entry, exception};
use panic_halt as _;
use serial_thermo::sensor::OVERSAMPLE;
use serial_thermo::{
    AnalogSource, Device, LineChartPage, OversampledSensor, PendingWork, Platform, Scheduler,
    Transport,
};

/// Core clock after reset (internal oscillator).
const CORE_CLOCK_HZ: u32 = 8_000_000;

// Minimal ADC - returns a fixed conversion so only the core is measured
pub struct FixedAdc;

impl AnalogSource for FixedAdc {
    fn start_sequence(&mut self) {}

    fn read_sequence(&mut self) -> nb::Result<[u16; OVERSAMPLE], Infallible> {
        Ok([black_box(2934); OVERSAMPLE])
    }
}

// Minimal Transport implementation - measures only struct size
pub struct MinimalUart;

impl Transport for MinimalUart {
    type Error = ();

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        black_box(byte);
        Ok(())
    }
}

// SysTick as the one-second tick, WFI as the low-power wait
pub struct CortexPlatform {
    syst: SYST,
}

impl Platform for CortexPlatform {
    fn init(&mut self) {
        self.syst.set_clock_source(SystClkSource::Core);
        self.syst.set_reload(CORE_CLOCK_HZ - 1);
        self.syst.clear_current();
        self.syst.enable_counter();
        self.syst.enable_interrupt();
    }

    fn sleep_until_interrupt(&mut self, pending: &PendingWork) {
        // WFI with PRIMASK set still wakes on a pending interrupt, which
        // then runs once the critical section ends
        cortex_m::interrupt::free(|_| {
            if pending.is_empty() {
                cortex_m::asm::wfi();
            }
        });
    }

    fn set_actuator(&mut self, on: bool) {
        black_box(on);
    }
}

static DEVICE: Device<OversampledSensor<FixedAdc>> =
    Device::new(OversampledSensor::internal_diode(FixedAdc));

// Entry point
#[entry]
fn main() -> ! {
    let Some(core) = cortex_m::Peripherals::take() else {
        loop {
            cortex_m::asm::nop();
        }
    };

    // Feed one byte so the receive path is linked in; a real UART
    // interrupt handler calls this for every received byte
    black_box(DEVICE.on_byte_received(black_box(b'G')));

    let platform = CortexPlatform { syst: core.SYST };
    let scheduler = Scheduler::new(&DEVICE, MinimalUart, LineChartPage, platform);
    scheduler.run()
}

#[exception]
fn SysTick() {
    DEVICE.on_tick();
}

// Required: exception handler
#[exception]
unsafe fn HardFault(_ef: &cortex_m_rt::ExceptionFrame) -> ! {
    loop {
        cortex_m::asm::nop();
    }
}

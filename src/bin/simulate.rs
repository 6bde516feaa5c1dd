//! thermo-sim - host-side simulator for the serial-thermo core
//!
//! Drives a `Device` with a simulated ADC, injects one request line and
//! prints the generated reply to stdout. Run statistics go to stderr.
//!
//! Usage:
//! ```bash
//! cargo run --bin thermo-sim --features sim -- scenarios/line-chart.toml
//! ```
//!
//! Scenario format:
//! ```toml
//! start = [10, 0, 0]          # hour, minute, second
//! ticks = 3600                # seconds to simulate before the request
//! sensor = "ntc"              # "internal" or "ntc"
//! page = "line-chart"         # "line-chart" or "timeline"
//! request = "GET /?3=EIN"
//!
//! [ramp]                      # raw 12-bit ADC value per conversion
//! start = 3300
//! step = -8
//! noise = 4                   # optional +/- jitter
//!
//! [date]                      # optional, required by the timeline page
//! year = 2013
//! month = 3
//! day = 14
//! ```

use std::convert::Infallible;
use std::io::{self, BufWriter, Stdout, Write};
use std::process::ExitCode;

use serde::Deserialize;
use serial_thermo::{
    AnalogSource, CalendarDate, Clock, Device, DeviceError, Fragment, LineChartPage,
    OversampledSensor, PageTemplate, PendingWork, Platform, PowerState, Scheduler, SeriesStyle,
    TimelinePage,
    Transport, sensor::OVERSAMPLE,
};

/// Bytes a browser sends after the request target.
const REQUEST_TAIL: &str = " HTTP/1.1\r\nHost: thermo\r\n\r\n";

/// Largest 12-bit conversion result.
const ADC_MAX: i64 = 4095;

// =============================================================================
// Scenario
// =============================================================================

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum SensorKind {
    Internal,
    Ntc,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum PageKind {
    LineChart,
    Timeline,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct Ramp {
    start: u16,
    #[serde(default)]
    step: i32,
    #[serde(default)]
    noise: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct DateSpec {
    year: u16,
    month: u8,
    day: u8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct Scenario {
    #[serde(default)]
    start: [u8; 3],
    #[serde(default = "Scenario::default_ticks")]
    ticks: u32,
    sensor: SensorKind,
    #[serde(default = "Scenario::default_page")]
    page: PageKind,
    #[serde(default = "Scenario::default_request")]
    request: String,
    ramp: Ramp,
    date: Option<DateSpec>,
}

impl Scenario {
    fn default_ticks() -> u32 {
        3600
    }

    fn default_page() -> PageKind {
        PageKind::LineChart
    }

    fn default_request() -> String {
        "GET /".to_string()
    }

    fn validate(&self) -> Result<(), DeviceError> {
        let [hour, minute, second] = self.start;
        if hour > 23 || minute > 59 || second > 59 {
            return Err(DeviceError::invalid_config("start time out of range"));
        }
        if let Some(date) = &self.date {
            if !(1..=12).contains(&date.month) || !(1..=31).contains(&date.day) {
                return Err(DeviceError::invalid_config("date out of range"));
            }
        }
        if self.page == PageKind::Timeline && self.date.is_none() {
            return Err(DeviceError::invalid_config("timeline page needs a [date]"));
        }
        if self.ramp.start as i64 > ADC_MAX || self.ramp.noise as i64 > ADC_MAX {
            return Err(DeviceError::invalid_config("ramp exceeds 12-bit range"));
        }
        if !self.request.is_ascii() {
            return Err(DeviceError::invalid_config("request must be ASCII"));
        }
        Ok(())
    }

    fn clock(&self) -> Clock {
        let [hour, minute, second] = self.start;
        let clock = Clock::new(hour, minute, second);
        match &self.date {
            Some(d) => clock.with_date(CalendarDate::new(d.year, d.month, d.day)),
            None => clock,
        }
    }
}

// =============================================================================
// Simulated peripherals
// =============================================================================

/// ADC producing a linear ramp with optional random jitter.
#[derive(Debug)]
struct SimulatedAdc {
    ramp: Ramp,
    sequence: i64,
}

impl SimulatedAdc {
    fn new(ramp: Ramp) -> Self {
        Self { ramp, sequence: -1 }
    }

    fn jitter(&self) -> i64 {
        let noise = self.ramp.noise as i64;
        if noise == 0 {
            return 0;
        }
        let mut buf = [0u8; 2];
        match getrandom::fill(&mut buf) {
            Ok(()) => (u16::from_le_bytes(buf) as i64 % (2 * noise + 1)) - noise,
            Err(_) => 0,
        }
    }
}

impl AnalogSource for SimulatedAdc {
    fn start_sequence(&mut self) {
        self.sequence += 1;
    }

    fn read_sequence(&mut self) -> nb::Result<[u16; OVERSAMPLE], Infallible> {
        let base = self.ramp.start as i64 + self.ramp.step as i64 * self.sequence;
        let mut samples = [0u16; OVERSAMPLE];
        for sample in samples.iter_mut() {
            *sample = (base + self.jitter()).clamp(0, ADC_MAX) as u16;
        }
        Ok(samples)
    }
}

/// Serial line replaced by stdout.
struct StdoutTransport {
    out: BufWriter<Stdout>,
    sent: usize,
}

impl StdoutTransport {
    fn new() -> Self {
        Self {
            out: BufWriter::new(io::stdout()),
            sent: 0,
        }
    }
}

impl Transport for StdoutTransport {
    type Error = io::Error;

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        self.out.write_all(&[byte]).map_err(nb::Error::Other)?;
        self.sent += 1;
        Ok(())
    }
}

/// Platform with no peripherals; reports the actuator on stderr.
struct HostPlatform;

impl Platform for HostPlatform {
    fn sleep_until_interrupt(&mut self, _pending: &PendingWork) {
        std::thread::yield_now();
    }

    fn set_actuator(&mut self, on: bool) {
        eprintln!("actuator: {}", if on { "on" } else { "off" });
    }
}

/// Page selected by the scenario.
enum SimPage {
    LineChart(LineChartPage),
    Timeline(TimelinePage),
}

impl PageTemplate for SimPage {
    fn series_style(&self) -> SeriesStyle {
        match self {
            SimPage::LineChart(p) => p.series_style(),
            SimPage::Timeline(p) => p.series_style(),
        }
    }

    fn fragments(&self) -> &[Fragment] {
        match self {
            SimPage::LineChart(p) => p.fragments(),
            SimPage::Timeline(p) => p.fragments(),
        }
    }

    fn actuator_text(&self, on: bool) -> &str {
        match self {
            SimPage::LineChart(p) => p.actuator_text(on),
            SimPage::Timeline(p) => p.actuator_text(on),
        }
    }
}

// =============================================================================
// Main
// =============================================================================

fn run(scenario: &Scenario) -> Result<(), io::Error> {
    let adc = SimulatedAdc::new(scenario.ramp.clone());
    let sensor = match scenario.sensor {
        SensorKind::Internal => OversampledSensor::internal_diode(adc),
        SensorKind::Ntc => OversampledSensor::external_ntc(adc),
    };
    let device: Device<_> = Device::with_clock(sensor, scenario.clock());

    for _ in 0..scenario.ticks {
        device.on_tick();
    }

    let mut woke = false;
    for byte in scenario.request.bytes().chain(REQUEST_TAIL.bytes()) {
        woke |= device.on_byte_received(byte);
    }
    if !woke {
        eprintln!("request not recognized; no reply sent");
    }

    let page = match scenario.page {
        PageKind::LineChart => SimPage::LineChart(LineChartPage),
        PageKind::Timeline => SimPage::Timeline(TimelinePage),
    };
    let mut scheduler = Scheduler::new(&device, StdoutTransport::new(), page, HostPlatform);
    scheduler.start();
    if woke {
        while scheduler.poll()? != PowerState::Dispatch {}
    }
    scheduler.transport_mut().out.flush()?;

    let clock = device.clock();
    eprintln!(
        "clock: {:02}:{:02}:{:02}",
        clock.hour, clock.minute, clock.second
    );
    eprintln!("bytes sent: {}", scheduler.transport_mut().sent);
    eprintln!("windows discarded: {}", device.stats().windows_discarded());
    eprintln!("bytes ignored: {}", device.stats().bytes_ignored());
    if let Some(raw) = device.with_sensor(|s| s.last_raw()) {
        eprintln!("last raw reading: {}", raw);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let Some(path) = args.get(1) else {
        let program = args.first().map(String::as_str).unwrap_or("thermo-sim");
        eprintln!("Usage: {} <scenario.toml>", program);
        return ExitCode::from(2);
    };

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    let scenario: Scenario = match toml::from_str(&text) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Error parsing {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = scenario.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&scenario) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error writing reply: {}", e);
            ExitCode::FAILURE
        }
    }
}

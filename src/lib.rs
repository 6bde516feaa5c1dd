//! # serial-thermo
//!
//! Interrupt-driven temperature web page server core for small
//! microcontrollers talking to a network bridge over a serial line.
//!
//! **Key features:**
//! - **Static allocation** - Device state is const-constructible and fits in a `static`
//! - **Interrupt entry points** - Byte-received and one-second tick handlers that never block
//! - **Power-state scheduler** - Sleeps until work is pending, then renders and sends one reply
//! - **Fixed-width formatter** - Integer-to-text rendering without `core::fmt`
//! - **Flexible platform** - Transport, ADC and platform services are traits
//!
//! ## Optional Features
//!
//! - `defmt` - Log through `defmt` and derive `defmt::Format` for public types
//! - `sim` - Build the `thermo-sim` host simulator
//!
//! This library is `no_std` compatible.

#![no_std]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

extern crate heapless;

// Logging macros must be declared before the modules that use them
#[macro_use]
mod logging;

// ============================================================================
// Module Declarations
// ============================================================================

// Configuration and errors
pub mod config;
pub mod error;

// Serial transport
pub mod io;

// Number rendering
pub mod format;

// Temperature acquisition
pub mod sensor;

// Shared state and interrupt entry points
pub mod device;

// Reply rendering
pub mod response;

// Background control loop
pub mod scheduler;

// ============================================================================
// Re-exports - Public API
// ============================================================================

// Core I/O
pub use io::Transport;

// Configuration
pub use config::{CompactConfig, DefaultConfig, DeviceConfig, HISTORY_CAPACITY, RX_WINDOW_SIZE};

// Error types
pub use error::DeviceError;

// Formatter
pub use format::{FixedField, FormatSpec, format, format_into, try_format};

// Sensor types
pub use sensor::{
    AnalogSource, LinearCalibration, LookupTable, OversampledSensor, SensorStrategy,
    TemperatureSensor,
};

// Device state
pub use device::{
    ActuatorCommand, CalendarDate, Clock, Device, DropStats, PendingWork, Rollover,
    SampleHistory, Snapshot,
};

// Response types
pub use response::{
    Fragment, LineChartPage, PageTemplate, PageView, ResponseGenerator, SeriesStyle,
    TimelinePage,
};

// Scheduler types
pub use scheduler::{Platform, PowerState, Scheduler};

// ============================================================================
// Library Metadata
// ============================================================================

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Tests
// ============================================================================

//! Byte transport abstraction for the serial line.
//!
//! The `Transport` trait exposes the transmit register as a non-blocking
//! `nb` operation. The blocking `send_byte()` and the text helpers are layered
//! on top of it, so a platform only implements the single-register write.
//!
//! Receiving is interrupt driven and does not go through this trait: the
//! platform's receive interrupt hands each byte to
//! [`Device::on_byte_received()`](crate::device::Device::on_byte_received).

/// Line terminator appended by [`Transport::write_line()`].
pub const CRLF: &str = "\r\n";

/// Platform-agnostic serial transmit trait.
///
/// Only used from the background context (the response generator), never
/// from an interrupt handler, because `send_byte()` waits without a timeout.
pub trait Transport {
    /// Platform-specific error type
    type Error;

    /// Try to write one byte to the transmit register.
    ///
    /// Returns:
    /// - `Ok(())` if the byte was accepted
    /// - `Err(nb::Error::WouldBlock)` while the register is still busy
    /// - `Err(nb::Error::Other(e))` on a transport fault
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Transmit one byte, waiting until the transmit register is free.
    ///
    /// There is no timeout: a stalled peer stalls the caller.
    fn send_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        nb::block!(self.write_byte(byte))
    }

    /// Transmit bytes verbatim up to the first NUL terminator (if any).
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for &b in bytes.iter().take_while(|&&b| b != 0) {
            self.send_byte(b)?;
        }
        Ok(())
    }

    /// Transmit a string verbatim.
    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.write_bytes(s.as_bytes())
    }

    /// Transmit a string followed by CR/LF.
    fn write_line(&mut self, s: &str) -> Result<(), Self::Error> {
        self.write_str(s)?;
        self.write_str(CRLF)
    }
}

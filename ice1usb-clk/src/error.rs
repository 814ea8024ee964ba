use std::ops::Range;

/// An error from talking to the iCE1usb clock registers.
///
/// - `InvalidRegister`, `TuneRange`, and `InvalidParameter` are caught locally
///   before any USB traffic happens.
/// - `DeviceNotFound` means no board with the expected VID/PID is attached.
/// - `Io` & `Transfer` come from the USB stack and are never retried.
/// - `ReturnData` means the board answered a read with too few bytes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Underlying OS I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// Transfer error from `nusb`.
    #[error("USB transfer error")]
    Transfer(#[from] nusb::transfer::TransferError),

    /// The register index isn't 0 or 1.
    #[error("Invalid clock register ({0}), expected 0 (high) or 1 (low)")]
    InvalidRegister(String),

    /// The logical tune value is outside the range the wire encoding can carry.
    #[error("Invalid clock tune value ({val}), must be in {}..{}", .range.start, .range.end)]
    #[allow(missing_docs)]
    TuneRange { range: Range<i32>, val: i64 },

    /// Some argument is invalid in a way not easily expressed as a range.
    #[error("Invalid Parameter: {0}")]
    InvalidParameter(&'static str),

    /// No iCE1usb board was found on the bus.
    #[error("No iCE1usb device found (VID 0x{vid:04x}, PID 0x{pid:04x})")]
    #[allow(missing_docs)]
    DeviceNotFound { vid: u16, pid: u16 },

    /// Returned data from the board didn't make any sense.
    #[error("Invalid return data")]
    ReturnData,
}

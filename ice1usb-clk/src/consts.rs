//! USB identifiers, request codes, and tune value limits for the iCE1usb.

use std::ops::Range;

/// USB vendor ID of the iCE1usb (OpenMoko).
pub const ICE1USB_VID: u16 = 0x1d50;
/// USB product ID of the iCE1usb.
pub const ICE1USB_PID: u16 = 0x6145;

/// Vendor request codes understood by the clock driver in the board firmware.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ControlRequest {
    ClockSet = 0,
    ClockGet = 1,
}

/// bmRequestType for a device-to-host, vendor, device-recipient transfer.
pub const REQUEST_TYPE_VENDOR_IN: u8 = 0xc0;
/// bmRequestType for a host-to-device, vendor, device-recipient transfer.
pub const REQUEST_TYPE_VENDOR_OUT: u8 = 0x40;

/// Offset added to a logical tune value to get the unsigned wire value.
pub const TUNE_BIAS: i32 = 2048;
/// Valid logical tune values, before the bias is applied.
pub const TUNE_RANGE: Range<i32> = Range {
    start: -TUNE_BIAS,
    end: TUNE_BIAS,
};

/// Timeout for a single control transfer, in milliseconds.
pub const CONTROL_TIMEOUT_MS: u64 = 1000;

/// Power-on value of the high register, as set by the firmware (raw 2008).
pub const DEFAULT_TUNE_HI: i32 = -40;
/// Power-on value of the low register, as set by the firmware (raw 2048).
pub const DEFAULT_TUNE_LO: i32 = 0;

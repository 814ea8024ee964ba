/*!

Host-side access to the two clock trim registers of an [iCE1usb][ice1usb]
board, using the pure-rust [`nusb`] crate for USB interfacing.

[ice1usb]: https://osmocom.org/projects/e1-t1-adapter/wiki/ICE1usb

The board's firmware exposes a pair of vendor control requests that read and
write the trim values driving the oscillator's PDM outputs. This crate wraps
those two requests in a [`ClockSession`], which does the range checking and the
+2048 bias conversion between signed host values and unsigned register values.

The standard entry point is [`open_device()`], which opens the first attached
iCE1usb:

```no_run
use ice1usb_clk::ClockRegister;

fn main() -> Result<(), ice1usb_clk::Error> {
    let clk = ice1usb_clk::open_device()?;
    let hi = clk.get(ClockRegister::High)?;
    let lo = clk.get(ClockRegister::Low)?;
    println!("{hi}/{lo}");

    // Nudge the fine trim up by one step.
    clk.set(ClockRegister::Low, lo + 1)?;
    Ok(())
}
```

If more than one iCE1usb is attached, the first one reported by the OS is used.
There is no way to pick a specific board.

*/

#![warn(missing_docs)]

pub mod consts;
mod error;
mod transport;
mod tune;

use tracing::{debug, warn};

use crate::consts::*;

pub use crate::error::Error;
pub use crate::transport::ControlTransport;
pub use crate::tune::{ClockRegister, TuneValue, decode_tune, encode_tune};

/// An iCE1usb device descriptor, which can be opened.
///
/// These are mostly returned from calling [`list_devices`], but can also be
/// formed by trying to convert a [`nusb::DeviceInfo`] into one.
pub struct Ice1UsbDescriptor {
    info: nusb::DeviceInfo,
}

impl Ice1UsbDescriptor {
    /// Get the serial number of this board, as a string.
    pub fn serial(&self) -> Option<&str> {
        self.info.serial_number()
    }

    /// Bus number and device address, mostly useful for log messages.
    pub fn location(&self) -> (u8, u8) {
        (self.info.bus_number(), self.info.device_address())
    }

    /// Try and open this device descriptor.
    ///
    /// No interface is claimed, so this doesn't disturb a program already
    /// using the board's E1 interface. The device handle is closed when the
    /// session is dropped.
    pub fn open(self) -> Result<ClockSession<nusb::Device>, Error> {
        debug!("Opening {self:?}");
        let device = self.info.open()?;
        Ok(ClockSession::new(device))
    }
}

impl std::fmt::Debug for Ice1UsbDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (bus, addr) = self.location();
        f.debug_struct("Ice1UsbDescriptor")
            .field("bus", &bus)
            .field("address", &addr)
            .field("serial", &self.serial())
            .finish()
    }
}

/// Try and turn any [`nusb::DeviceInfo`] descriptor into an iCE1usb, failing
/// if the VID and PID don't match.
impl TryFrom<nusb::DeviceInfo> for Ice1UsbDescriptor {
    type Error = &'static str;
    fn try_from(value: nusb::DeviceInfo) -> Result<Self, Self::Error> {
        if value.vendor_id() != ICE1USB_VID {
            Err("VID doesn't match for iCE1usb")
        } else if value.product_id() != ICE1USB_PID {
            Err("VID recognized, PID not recognized")
        } else {
            Ok(Ice1UsbDescriptor { info: value })
        }
    }
}

/// List all attached iCE1usb devices.
pub fn list_devices() -> Result<Vec<Ice1UsbDescriptor>, Error> {
    Ok(nusb::list_devices()?
        .filter_map(|d| Ice1UsbDescriptor::try_from(d).ok())
        .collect::<Vec<Ice1UsbDescriptor>>())
}

/// Find the first attached iCE1usb, if there is one.
pub fn find_device() -> Result<Option<Ice1UsbDescriptor>, Error> {
    let mut devices = list_devices()?;
    if devices.len() > 1 {
        warn!(
            "{} iCE1usb devices attached, using the first one",
            devices.len()
        );
    }
    Ok(if devices.is_empty() {
        None
    } else {
        Some(devices.swap_remove(0))
    })
}

/// Open the first detected iCE1usb device in the system.
///
/// This is a shortcut for calling [`find_device`] and opening the result.
pub fn open_device() -> Result<ClockSession<nusb::Device>, Error> {
    find_device()?
        .ok_or(Error::DeviceNotFound {
            vid: ICE1USB_VID,
            pid: ICE1USB_PID,
        })?
        .open()
}

/// A session with one iCE1usb, used to read and write its clock trim
/// registers.
///
/// Every call is a single, independent control transfer. Nothing is cached,
/// and nothing is retried.
pub struct ClockSession<T> {
    transport: T,
}

impl<T: ControlTransport> ClockSession<T> {
    /// Wrap an already-opened transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Consume the session, returning the underlying transport.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Read the raw, still-biased value of a register.
    pub fn get_raw(&self, reg: ClockRegister) -> Result<u16, Error> {
        let ret = self.transport.control_in(
            REQUEST_TYPE_VENDOR_IN,
            ControlRequest::ClockGet as u8,
            0,
            reg.index(),
            2,
        )?;
        let ret: [u8; 2] = ret.as_slice().try_into().map_err(|_| Error::ReturnData)?;
        let raw = u16::from_le_bytes(ret);
        debug!("Read clock register {reg}: raw {raw}");
        Ok(raw)
    }

    /// Read the logical value of a clock register.
    ///
    /// The value isn't range-checked, so a board reporting something outside
    /// `-2048..2048` gets passed through as-is.
    pub fn get(&self, reg: ClockRegister) -> Result<i32, Error> {
        self.get_raw(reg).map(decode_tune)
    }

    /// Write a logical value to a clock register.
    ///
    /// `val` must be in `-2048..2048`, and is checked before anything is sent.
    pub fn set(&self, reg: ClockRegister, val: i32) -> Result<(), Error> {
        let raw = encode_tune(val)?;
        debug!("Write clock register {reg}: {val} (raw {raw})");
        self.transport.control_out(
            REQUEST_TYPE_VENDOR_OUT,
            ControlRequest::ClockSet as u8,
            raw,
            reg.index(),
            &[],
        )
    }

    /// Write both registers back to the values the firmware starts with.
    pub fn set_defaults(&self) -> Result<(), Error> {
        self.set(ClockRegister::High, DEFAULT_TUNE_HI)?;
        self.set(ClockRegister::Low, DEFAULT_TUNE_LO)
    }
}

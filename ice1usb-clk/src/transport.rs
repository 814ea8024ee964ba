//! The control-transfer seam between the clock session and the USB stack.

use std::time::Duration;

use nusb::transfer::{Control, ControlType, Recipient};

use crate::Error;
use crate::consts::CONTROL_TIMEOUT_MS;

const DIR_IN: u8 = 0x80;

/// Something that can issue control transfers to the device.
///
/// `request_type` is the raw bmRequestType byte. Both calls block until the
/// transfer completes or the USB stack reports an error.
pub trait ControlTransport {
    /// Device-to-host transfer, returning up to `length` bytes.
    fn control_in(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        length: u16,
    ) -> Result<Vec<u8>, Error>;

    /// Host-to-device transfer. `data` may be empty, in which case there is no
    /// data stage.
    fn control_out(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<(), Error>;
}

/// Split a bmRequestType byte into the type and recipient `nusb` wants,
/// checking the direction bit against the call it was given to.
fn split_request_type(request_type: u8, dir_in: bool) -> Result<(ControlType, Recipient), Error> {
    if (request_type & DIR_IN != 0) != dir_in {
        return Err(Error::InvalidParameter("request type direction mismatch"));
    }
    let control_type = match (request_type >> 5) & 0x3 {
        0 => ControlType::Standard,
        1 => ControlType::Class,
        2 => ControlType::Vendor,
        _ => return Err(Error::InvalidParameter("reserved request type")),
    };
    let recipient = match request_type & 0x1f {
        0 => Recipient::Device,
        1 => Recipient::Interface,
        2 => Recipient::Endpoint,
        3 => Recipient::Other,
        _ => return Err(Error::InvalidParameter("reserved request recipient")),
    };
    Ok((control_type, recipient))
}

/// Transfers go straight to the device handle, without claiming an interface,
/// so this works while another program holds the E1 interface.
///
/// `nusb` doesn't support device-level control transfers on Windows, where
/// these calls fail with a transfer error.
impl ControlTransport for nusb::Device {
    fn control_in(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        length: u16,
    ) -> Result<Vec<u8>, Error> {
        let (control_type, recipient) = split_request_type(request_type, true)?;
        let mut buf = vec![0u8; length as usize];
        let len = self.control_in_blocking(
            Control {
                control_type,
                recipient,
                request,
                value,
                index,
            },
            &mut buf,
            Duration::from_millis(CONTROL_TIMEOUT_MS),
        )?;
        buf.truncate(len);
        Ok(buf)
    }

    fn control_out(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<(), Error> {
        let (control_type, recipient) = split_request_type(request_type, false)?;
        self.control_out_blocking(
            Control {
                control_type,
                recipient,
                request,
                value,
                index,
            },
            data,
            Duration::from_millis(CONTROL_TIMEOUT_MS),
        )?;
        Ok(())
    }
}

impl<T: ControlTransport + ?Sized> ControlTransport for &T {
    fn control_in(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        length: u16,
    ) -> Result<Vec<u8>, Error> {
        (**self).control_in(request_type, request, value, index, length)
    }

    fn control_out(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<(), Error> {
        (**self).control_out(request_type, request, value, index, data)
    }
}

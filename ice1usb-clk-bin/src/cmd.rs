use std::io::Write;

use color_eyre::eyre::Context;
use ice1usb_clk::{ClockRegister, ClockSession, ControlTransport, TuneValue};

/// What a single invocation does with the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Print both registers as `HI/LO`.
    Read,
    /// Set the high register, then optionally the low one.
    Write { hi: TuneValue, lo: Option<TuneValue> },
    /// Restore the firmware's power-on values.
    Defaults,
}

impl Action {
    /// Carry out the action. A failed second write leaves the first one in
    /// place.
    pub fn run<T: ControlTransport>(
        self,
        clk: &ClockSession<T>,
        out: &mut impl Write,
    ) -> color_eyre::Result<()> {
        match self {
            Action::Read => {
                let hi = clk
                    .get(ClockRegister::High)
                    .wrap_err("Failed reading high clock register")?;
                let lo = clk
                    .get(ClockRegister::Low)
                    .wrap_err("Failed reading low clock register")?;
                writeln!(out, "{hi}/{lo}")?;
            }
            Action::Write { hi, lo } => {
                clk.set(ClockRegister::High, hi.get())
                    .wrap_err("Failed setting high clock register")?;
                if let Some(lo) = lo {
                    clk.set(ClockRegister::Low, lo.get())
                        .wrap_err("Failed setting low clock register")?;
                }
            }
            Action::Defaults => {
                clk.set_defaults()
                    .wrap_err("Failed restoring default clock registers")?;
            }
        }
        Ok(())
    }
}

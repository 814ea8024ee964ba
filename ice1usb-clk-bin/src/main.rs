mod cmd;

use clap::Parser;
use color_eyre::eyre::Context;
use ice1usb_clk::TuneValue;
use tracing::debug;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

use crate::cmd::Action;

/// Read or set the clock trim registers of an attached iCE1usb.
///
/// With no values, prints the current settings as `HI/LO`. With one value,
/// sets the high register. With two, sets the high register and then the low
/// register. Values must be in -2048..2048.
#[derive(Parser, Debug)]
#[command(version, about, allow_negative_numbers = true)]
struct Cli {
    /// New value for the high (coarse) trim register
    hi: Option<TuneValue>,

    /// New value for the low (fine) trim register
    #[arg(requires = "hi")]
    lo: Option<TuneValue>,

    /// Write the firmware's power-on defaults to both registers
    #[arg(long, conflicts_with_all = ["hi", "lo"])]
    defaults: bool,

    /// Log every USB transfer to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn action(&self) -> Action {
        if self.defaults {
            return Action::Defaults;
        }
        match self.hi {
            None => Action::Read,
            Some(hi) => Action::Write { hi, lo: self.lo },
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();
    init_tracing(args.verbose);

    let action = args.action();
    debug!("Running {action:?}");

    let clk = ice1usb_clk::open_device().wrap_err("Couldn't open the iCE1usb")?;

    let stdout = std::io::stdout();
    action.run(&clk, &mut stdout.lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("ice1usb-clk").chain(args.iter().copied()))
    }

    #[test]
    fn no_args_reads() {
        assert_eq!(parse(&[]).unwrap().action(), Action::Read);
    }

    #[test]
    fn one_value_sets_high_only() -> anyhow::Result<()> {
        let action = parse(&["100"])?.action();
        assert_eq!(
            action,
            Action::Write {
                hi: TuneValue::new(100)?,
                lo: None
            }
        );
        Ok(())
    }

    #[test]
    fn two_values_with_negative() -> anyhow::Result<()> {
        let action = parse(&["100", "-50"])?.action();
        assert_eq!(
            action,
            Action::Write {
                hi: TuneValue::new(100)?,
                lo: Some(TuneValue::new(-50)?)
            }
        );
        Ok(())
    }

    #[test]
    fn out_of_range_rejected_at_parse() {
        assert!(parse(&["9999"]).is_err());
        assert!(parse(&["0", "2048"]).is_err());
        assert!(parse(&["-2049"]).is_err());
        assert!(parse(&["-2048", "2047"]).is_ok());
    }

    #[test]
    fn non_integer_rejected() {
        assert!(parse(&["abc"]).is_err());
        assert!(parse(&["1.5"]).is_err());
        assert!(parse(&["1", "2", "3"]).is_err());
    }

    #[test]
    fn defaults_flag() {
        assert_eq!(parse(&["--defaults"]).unwrap().action(), Action::Defaults);
        assert!(parse(&["--defaults", "5"]).is_err());
    }
}

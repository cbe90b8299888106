use docopt::Docopt;
use serde_derive::Deserialize;

#[cfg(target_os = "linux")]
use bme280_driver::linux::LinuxI2cInterface;
use bme280_driver::*;

const USAGE: &str = "
Reading BME280 sensor value

Usage:
  bme280 <device> [options] [--temperature] [--pressure] [--humidity]
  bme280 (-h | --help)
  bme280 (-v | --version)

Options:
  -h --help          Show this help text.
  --address <addr>   I2C device address [default: 118] (=0x76)
  --normal           Run in normal mode and read the last sample instead of a forced one.
  --osrs-t <n>       Temperature oversampling: 0, 1, 2, 4, 8 or 16 [default: 1]
  --osrs-p <n>       Pressure oversampling: 0, 1, 2, 4, 8 or 16 [default: 1]
  --osrs-h <n>       Humidity oversampling: 0, 1, 2, 4, 8 or 16 [default: 1]
  --filter <n>       IIR filter coefficient: 0, 2, 4, 8 or 16 [default: 0]
  --standby <ms>     Standby time in normal mode [default: 0.5]
  --fixed32          Use the 32-bit pressure formula.
  --float            Print floating point values.
  --temperature      Show temperature.
  --pressure         Show pressure.
  --humidity         Show humidity.
  -v --version       Show version.
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_device: String,
    flag_address: u16,
    flag_normal: bool,
    flag_osrs_t: u8,
    flag_osrs_p: u8,
    flag_osrs_h: u8,
    flag_filter: u8,
    flag_standby: f32,
    flag_fixed32: bool,
    flag_float: bool,
    flag_version: bool,
    flag_temperature: bool,
    flag_pressure: bool,
    flag_humidity: bool,
}

impl Args {
    fn config(&self) -> Result<Config, ParamError> {
        Ok(Config {
            oversampling_t: Oversampling::from_factor(self.flag_osrs_t)?,
            oversampling_p: Oversampling::from_factor(self.flag_osrs_p)?,
            oversampling_h: Oversampling::from_factor(self.flag_osrs_h)?,
            mode: if self.flag_normal { Mode::Normal } else { Mode::Sleep },
            standby: StandbyTime::from_millis(self.flag_standby)?,
            filter: Filter::from_coefficient(self.flag_filter)?,
            spi3w_enabled: false,
        })
    }

    fn show_all(&self) -> bool {
        !(self.flag_temperature || self.flag_pressure || self.flag_humidity)
    }
}

#[cfg(not(target_os = "linux"))]
fn main() {
    println!("This program can run only on Linux")
}

#[cfg(target_os = "linux")]
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    if args.flag_version {
        println!("bme280 {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = args.config()?;
    let compensation = if args.flag_fixed32 {
        PressureCompensation::Fixed32
    } else {
        PressureCompensation::Fixed64
    };

    let iface = LinuxI2cInterface::new(&args.arg_device, args.flag_address)?;
    let mut bme280 = Bme280::with_pressure_compensation(iface, compensation);
    bme280.init()?;
    bme280.configure_all(&config)?;

    let measurement = if args.flag_normal {
        // first cycle has to complete before the data registers are valid
        let cycle = settings::max_measurement_time_ms(
            config.oversampling_t,
            config.oversampling_p,
            config.oversampling_h,
        );
        std::thread::sleep(std::time::Duration::from_millis(cycle as u64));
        bme280.read_last_all()?
    } else {
        bme280.read_forced_all()?
    };

    if args.flag_float {
        let m = MeasurementF::from(measurement);
        if args.show_all() || args.flag_temperature {
            println!("{:.2}", m.temperature);
        }
        if args.show_all() || args.flag_pressure {
            println!("{:.2}", m.pressure);
        }
        if args.show_all() || args.flag_humidity {
            println!("{:.2}", m.humidity);
        }
    } else {
        if args.show_all() || args.flag_temperature {
            let (int, fract) = measurement.temperature.split();
            let sign = if measurement.temperature.0 < 0 && int == 0 { "-" } else { "" };
            println!("{}{}.{:02}", sign, int, fract.abs());
        }
        if args.show_all() || args.flag_pressure {
            let (int, fract) = measurement.pressure.split();
            match measurement.pressure.compensation() {
                PressureCompensation::Fixed32 => println!("{}.{:02}", int, fract),
                PressureCompensation::Fixed64 => println!("{}.{:03}", int, fract),
            }
        }
        if args.show_all() || args.flag_humidity {
            let (int, fract) = measurement.humidity.split();
            println!("{}.{:03}", int, fract);
        }
    }

    Ok(())
}

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

use std::time::Duration;

use abstutil::prettyprint_usize;
use anyhow::{Context, Result};
use structopt::StructOpt;

use model::{Simulation, SimulationClock, SimulationConfig};

#[derive(StructOpt)]
struct Args {
    /// The path to a CSV file with latitude and longitude columns
    #[structopt(long)]
    track: String,
    /// The path to a JSON file with simulation settings
    #[structopt(long)]
    config: Option<String>,
    /// Comma-separated runner speeds in km/h. Overrides the config.
    #[structopt(long, use_delimiter = true)]
    speeds: Vec<f64>,
    /// Where the clock starts
    #[structopt(long, default_value = "5")]
    elapsed_minutes: f64,
    /// After the starting time, print this many more ticks of the configured step
    #[structopt(long, default_value = "0")]
    steps: usize,
    /// Write the track and final runner positions to this GeoJSON file
    #[structopt(long)]
    geojson: Option<String>,
}

impl Args {
    fn config(&self) -> Result<SimulationConfig> {
        let mut config = match self.config {
            Some(ref path) => SimulationConfig::load(path)?,
            None => SimulationConfig::default(),
        };
        if !self.speeds.is_empty() {
            config.speeds_kmh = self.speeds.clone();
        }
        Ok(config)
    }

    fn start_clock(&self, config: &SimulationConfig) -> Result<SimulationClock> {
        if !self.elapsed_minutes.is_finite() || self.elapsed_minutes < 0.0 {
            bail!("--elapsed-minutes can't be {}", self.elapsed_minutes);
        }
        let elapsed = Duration::try_from_secs_f64(self.elapsed_minutes * 60.0)
            .with_context(|| format!("--elapsed-minutes {} is too large", self.elapsed_minutes))?;
        let mut clock = SimulationClock::at(elapsed);
        clock.set_speed_setting(config.speed_setting);
        Ok(clock)
    }
}

fn main() -> Result<()> {
    abstutil::logger::setup();

    let args = Args::from_iter(abstutil::cli_args());
    let config = args.config()?;
    let track = track::load_csv(fs_err::File::open(&args.track)?)?;
    let sim = Simulation::new(track, &config.speeds_kmh)?;
    println!(
        "Loaded track with {} points. Total distance: {:.2} m",
        prettyprint_usize(sim.track().track().len()),
        sim.track().total_distance()
    );

    let mut clock = args.start_clock(&config)?;
    print_positions(&sim, &clock);

    if args.steps > 0 {
        let step = config.step()?;
        let mut finished: Vec<bool> = sim
            .positions(&clock)
            .into_iter()
            .map(|pos| pos.finished)
            .collect();
        clock.start();
        for _ in 0..args.steps {
            clock.step(step);
            print_positions(&sim, &clock);
            for (pos, done) in sim.positions(&clock).into_iter().zip(finished.iter_mut()) {
                if pos.finished && !*done {
                    info!("{} finished at {}s", pos.name, clock.elapsed_seconds());
                    *done = true;
                }
            }
        }
        clock.stop();
    }

    if let Some(ref path) = args.geojson {
        sim.export_to_geojson(path, &clock)?;
    }
    Ok(())
}

fn print_positions(sim: &Simulation, clock: &SimulationClock) {
    println!("Elapsed time: {} seconds", clock.elapsed_seconds().round());
    for pos in sim.positions(clock) {
        println!(
            "  {}: {:.2} m, at ({:.6}, {:.6}){}",
            pos.name,
            pos.distance,
            pos.position.latitude,
            pos.position.longitude,
            if pos.finished { ", finished" } else { "" }
        );
    }
}

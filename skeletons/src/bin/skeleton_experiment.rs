// Copyright (c) 2024 Marc Pabst
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use skeletons::catalog::{sketches, stimulus_by_id};
use skeletons::experiment::{Experiment, RunSummary};
use skeletons::logging::{read_log, FrameStats, StimulusLog};
use skeletons::options::{AdvanceMode, ExperimentOptions};
use skeletons::visual::geometry::MonitorProfile;
use skeletons::visual::raster_window::RasterWindow;
use skeletons::visual::recording::RecordingWindow;
use skeletons::visual::stimuli::Stimulus;
use skeletons::visual::window::{RenderWindow, WindowOptions};

/// Skeleton shape experiment
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a session in an off-screen window
    Run {
        #[command(flatten)]
        session: SessionArgs,

        #[command(flatten)]
        display: DisplayArgs,

        /// Write every frame as PNG into this directory
        #[arg(long)]
        frames: Option<PathBuf>,

        /// Do not wait for the refresh interval between frames
        #[arg(long)]
        unpaced: bool,
    },

    /// Run a session on a simulated clock without drawing anything
    Simulate {
        #[command(flatten)]
        session: SessionArgs,

        /// Refresh rate of the simulated display in Hz
        #[arg(long, default_value_t = 60.0)]
        refresh_rate: f64,
    },

    /// Render a single stimulus to a PNG file
    Preview {
        /// Catalog id (0-9 shapes, 10 motion)
        #[arg(long, conflicts_with = "sketch")]
        id: Option<u32>,

        /// Name of a design sketch (skel1 to skel4)
        #[arg(long)]
        sketch: Option<String>,

        /// Line thickness in pixels
        #[arg(long, default_value_t = 10.0)]
        thickness: f64,

        #[command(flatten)]
        display: DisplayArgs,

        /// Output file
        #[arg(short, long, default_value = "preview.png")]
        output: PathBuf,
    },

    /// Print frame interval statistics of a stimulus log
    Summarize {
        /// CSV or TSV log written by `run`
        log: PathBuf,
    },
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// Line thickness in pixels
    #[arg(long, default_value_t = 10.0)]
    thickness: f64,

    /// Seconds a stimulus is shown per interval
    #[arg(long, default_value_t = 1.0)]
    duration_on: f64,

    /// Seconds of blank screen per interval
    #[arg(long, default_value_t = 1.0)]
    duration_off: f64,

    /// Keep the catalog order instead of shuffling it
    #[arg(long)]
    ordered: bool,

    /// Seed for the shuffle
    #[arg(long)]
    seed: Option<u64>,

    /// Session length in seconds
    #[arg(long, default_value_t = 300.0)]
    duration: f64,

    /// When to switch to the next stimulus (interval-count, edge-triggered)
    #[arg(long, default_value_t = AdvanceMode::IntervalCount)]
    advance_mode: AdvanceMode,

    /// Fade each stimulus in, adding this much opacity per frame
    #[arg(long)]
    fade_step: Option<f64>,

    /// Stimulus log (.csv or .tsv)
    #[arg(long)]
    log: Option<PathBuf>,

    /// Replace an existing log file
    #[arg(long)]
    overwrite: bool,
}

#[derive(Args, Debug)]
struct DisplayArgs {
    /// Window width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Use the monitor's native resolution
    #[arg(long)]
    fullscreen: bool,

    /// Refresh rate in Hz
    #[arg(long, default_value_t = 60.0)]
    refresh_rate: f64,

    /// Visible screen width in cm
    #[arg(long, default_value_t = 30.0)]
    monitor_width: f64,

    /// Eye to screen distance in cm
    #[arg(long, default_value_t = 15.0)]
    distance: f64,
}

impl SessionArgs {
    fn options(&self) -> ExperimentOptions {
        ExperimentOptions {
            thickness: self.thickness,
            duration_on: self.duration_on,
            duration_off: self.duration_off,
            random: !self.ordered,
            seed: self.seed,
            duration: self.duration,
            advance_mode: self.advance_mode,
            fade_step: self.fade_step,
        }
    }

    fn stimulus_log(&self) -> Result<StimulusLog> {
        match &self.log {
            Some(path) => StimulusLog::with_file(path, self.overwrite)
                .with_context(|| format!("failed to open log file {}", path.display())),
            None => Ok(StimulusLog::new()),
        }
    }
}

impl DisplayArgs {
    fn monitor(&self) -> MonitorProfile {
        MonitorProfile {
            name: "testMonitor".to_string(),
            width_cm: self.monitor_width,
            distance_cm: self.distance,
            size_px: (self.width, self.height),
        }
    }

    fn window_options(&self) -> WindowOptions {
        if self.fullscreen {
            WindowOptions::Fullscreen {
                refresh_rate: Some(self.refresh_rate),
            }
        } else {
            WindowOptions::Windowed {
                resolution: Some((self.width, self.height)),
                refresh_rate: Some(self.refresh_rate),
            }
        }
    }

    fn window(&self) -> Result<RasterWindow> {
        RasterWindow::new(self.window_options(), self.monitor()).context("failed to create window")
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            session,
            display,
            frames,
            unpaced,
        } => {
            let mut window = display.window()?.with_pacing(!unpaced);
            if let Some(seed) = session.seed {
                window = window.with_seed(seed);
            }
            if let Some(dir) = frames {
                window = window.with_frame_dir(dir)?;
            }
            run_session(&session, &mut window)
        }
        Commands::Simulate { session, refresh_rate } => {
            if !(refresh_rate > 0.0) {
                bail!("refresh rate must be positive, got {}", refresh_rate);
            }
            let mut window = RecordingWindow::new((800, 800), refresh_rate);
            run_session(&session, &mut window)
        }
        Commands::Preview {
            id,
            sketch,
            thickness,
            display,
            output,
        } => preview(id, sketch, thickness, &display, &output),
        Commands::Summarize { log } => summarize(&log),
    }
}

fn run_session(session: &SessionArgs, window: &mut dyn RenderWindow) -> Result<()> {
    let mut experiment = Experiment::from_catalog(session.options())?;
    log::info!("presentation order: {:?}", experiment.order());

    let mut log = session.stimulus_log()?;
    let summary = experiment.run(window, &mut log)?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "{} frames in {:.3} s{}",
        summary.frames,
        summary.elapsed,
        if summary.stopped_by_input { " (stopped by input)" } else { "" }
    );
    if let Some(stats) = &summary.frame_stats {
        print_stats(stats);
    }
}

fn print_stats(stats: &FrameStats) {
    println!("min frame interval: {}", stats.min);
    println!("max frame interval: {}", stats.max);
    println!("mean frame interval: {}", stats.mean);
}

fn preview(
    id: Option<u32>,
    sketch: Option<String>,
    thickness: f64,
    display: &DisplayArgs,
    output: &std::path::Path,
) -> Result<()> {
    let mut stimulus: Box<dyn Stimulus> = match (id, sketch) {
        (_, Some(name)) => match sketches().into_iter().find(|(n, _)| *n == name) {
            Some((_, stim)) => Box::new(stim),
            None => bail!("unknown sketch '{}', expected one of skel1 to skel4", name),
        },
        (Some(id), None) => stimulus_by_id(id, thickness)?,
        (None, None) => bail!("either --id or --sketch is required"),
    };

    let mut window = display.window()?.with_pacing(false);
    stimulus.draw(&mut window);
    window
        .save_frame(output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    window.close();

    log::info!("wrote stimulus {} to {}", stimulus.stimulus_id(), output.display());
    Ok(())
}

fn summarize(path: &std::path::Path) -> Result<()> {
    let records = read_log(path).with_context(|| format!("failed to read {}", path.display()))?;
    let shown = records.iter().filter(|r| r.stimulus_shown).count();
    println!("{} frames, {} with a stimulus on screen", records.len(), shown);

    match FrameStats::from_times(records.iter().map(|r| r.time)) {
        Some(stats) => print_stats(&stats),
        None => println!("not enough frames for interval statistics"),
    }
    Ok(())
}

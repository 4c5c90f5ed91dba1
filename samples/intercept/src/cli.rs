use std::path::PathBuf;

use clap::ValueHint;
use nalgebra::Vector3;

use std::str::FromStr;

/// How log events are written to stderr.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    /// One short line per event
    Compact,
    /// Multi-line, human-oriented
    Pretty,
    /// Newline-delimited JSON
    Json,
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "warn,voxray=info,intercept=info",
        env = "VOXRAY_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Snap each point of a cloud to the center of its voxel
    Voxelize {
        /// The full width of a single voxel along each axis
        #[arg(
            short,
            long,
            default_value = "1,1,1",
            value_parser = parse_vec3::<f64>,
            value_name = "X,Y,Z"
        )]
        edge: Vector3<f64>,
        /// Only print each voxel center once
        #[arg(short, long)]
        unique: bool,
        /// Point cloud; one `x,y,z` row per point
        #[arg(value_hint = ValueHint::FilePath)]
        points: PathBuf,
    },
    /// Tally ray interceptions for every voxel
    Intercept {
        /// The full width of a single voxel along each axis
        #[arg(
            short,
            long,
            default_value = "1,1,1",
            value_parser = parse_vec3::<f64>,
            value_name = "X,Y,Z"
        )]
        edge: Vector3<f64>,
        /// Worker threads; 0 or less uses every available core
        #[arg(
            short,
            long,
            default_value_t = 0,
            allow_negative_numbers = true,
            env = "VOXRAY_THREADS"
        )]
        threads: i64,
        /// Only count entered/not-entered rays, without path lengths
        #[arg(short, long)]
        reduced: bool,
        /// Report progress while voxels are processed
        #[arg(short, long)]
        progress: bool,
        /// Ray origins; one `x,y,z` row per ray
        #[arg(long, value_hint = ValueHint::FilePath)]
        origins: PathBuf,
        /// Ray ends, paired with `origins` by row
        #[arg(long, value_hint = ValueHint::FilePath)]
        ends: PathBuf,
        /// Voxel centers; one `x,y,z` row per voxel
        #[arg(long, value_hint = ValueHint::FilePath)]
        voxels: PathBuf,
    },
}

fn parse_vec3<R: FromStr>(
    s: &str,
) -> Result<Vector3<R>, Box<dyn std::error::Error + Send + Sync + 'static>>
where
    <R as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let mut split = s.trim().split(',');
    let mut next = || {
        split
            .next()
            .ok_or_else(|| format!("expected three comma-separated values, found {s:?}"))
    };
    let x = R::from_str(next()?.trim())?;
    let y = R::from_str(next()?.trim())?;
    let z = R::from_str(next()?.trim())?;
    Ok(nalgebra::vector![x, y, z])
}

/// Scheduler thread count for a requested `--threads` value.
///
/// Anything below one leaves the choice to the scheduler, which then uses every core.
pub fn worker_threads(requested: i64) -> usize {
    usize::try_from(requested).unwrap_or(0)
}

/// Send log events to stderr, leaving stdout for the output table.
///
/// Thread names are kept so progress events show which scheduler worker finished a voxel.
pub(crate) fn initialize_tracing(log_filter: &str, log_format: LogFormat) {
    let local = time::UtcOffset::current_local_offset().ok();
    let timer = tracing_subscriber::fmt::time::OffsetTime::new(
        local.unwrap_or(time::UtcOffset::UTC),
        time::macros::format_description!("[hour]:[minute]:[second].[subsecond digits:3]"),
    );
    let tsub = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(log_format != LogFormat::Json)
        .with_timer(timer)
        .with_thread_names(true)
        .with_env_filter(log_filter);

    match log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }

    if local.is_none() {
        tracing::warn!("couldn't get local time offset, logging in UTC");
    }
}


extern crate clap;
extern crate colored;
extern crate env_logger;
extern crate gnss_log_compare;
extern crate serde;

use std::path::PathBuf;

use clap::{Arg, App};
use colored::*;
use gnss_log_compare::{compare_logs, compare_logs_concurrent, Comparison, GnssLogErr, ReferencePosition, RunConfig};
use gnss_log_compare::compare::aggregate::{self, Histogram};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Report {
	comparison: Comparison,
	cn0_histograms: Vec<Histogram>,
}

fn build_config(matches:&clap::ArgMatches) -> Result<RunConfig, GnssLogErr> {
	let mut config = match matches.value_of("config") {
		Some(path) => RunConfig::from_json_file(&PathBuf::from(path))?,
		None => {
			let logs:Vec<PathBuf> = matches.values_of("file").map(|v| v.map(PathBuf::from).collect()).unwrap_or_default();
			RunConfig::new(logs, ReferencePosition::default())
		}
	};

	// Command line values override the config file
	if let Some(s) = matches.value_of("reference") {
		config.reference = ReferencePosition::parse(s)?;
	}
	if let Some(s) = matches.value_of("talkers") {
		config.talkers = s.split(',').map(|t| t.trim().to_string()).collect();
	}

	config.validate()?;
	Ok(config)
}

fn run(matches:&clap::ArgMatches) -> Result<Report, GnssLogErr> {
	let config = build_config(matches)?;
	let bins:usize = match matches.value_of("histogram_bins") {
		Some(s) => s.parse().map_err(|_| GnssLogErr::InvalidConfig(format!("histogram bins '{}' is not a count", s)))?,
		None => aggregate::DEFAULT_HISTOGRAM_BINS,
	};

	for (idx, path) in config.logs.iter().enumerate() {
		eprintln!("Device {}: {}", idx, path.display());
	}

	let comparison = if matches.is_present("concurrent") {
		let mut rt = tokio::runtime::Runtime::new().map_err(|e| GnssLogErr::Worker(e.to_string()))?;
		rt.block_on(compare_logs_concurrent(&config))?
	} else {
		compare_logs(&config)?
	};

	let cn0_histograms:Vec<Histogram> = comparison.series.devices.iter().filter_map(|d| aggregate::cn0_histogram(d, bins)).collect();

	Ok(Report{ comparison, cn0_histograms })
}

fn main() {

	env_logger::Builder::from_default_env()
		.target(env_logger::Target::Stderr)
		.format_timestamp_secs()
		.init();

	let matches = App::new("GNSSLogger Multi-Device Comparison")
		.version("0.1.0")
		.about("Aligns GNSSLogger files recorded side by side and produces per-epoch HDOP, SV, CN0, fix and position error series")
		.arg(Arg::with_name("file")
			.short("f").long("file")
			.help("Log file; repeat once per device, in device order")
			.takes_value(true).multiple(true).number_of_values(1)
			.required_unless("config"))
		.arg(Arg::with_name("config")
			.short("c").long("config")
			.help("JSON run configuration with 'logs', 'reference' and 'talkers'")
			.takes_value(true))
		.arg(Arg::with_name("reference")
			.short("r").long("reference")
			.help("Reference position as 'lat,lon,alt' in decimal degrees and meters; '0,0,0' disables position errors")
			.takes_value(true))
		.arg(Arg::with_name("talkers").long("talkers").takes_value(true)
			.help("Comma-separated NMEA talker ids to decode, default 'GP,GN'"))
		.arg(Arg::with_name("histogram_bins").long("histogram-bins").takes_value(true)
			.help("Number of bins in the CN0 histograms, default 40"))
		.arg(Arg::with_name("concurrent").long("concurrent")
			.help("Read the logs in parallel"))
		.get_matches();

	match run(&matches) {
		Ok(report) => {
			let window = &report.comparison.window;
			eprintln!("{}", format!("Common window {} - {}, {} epochs", window.common_start, window.common_end, window.common_epoch_count).green().bold());
			for (d, offset) in report.comparison.series.devices.iter().zip(window.start_offsets.iter()) {
				let cn0_epochs = d.cn0_samples().len();
				eprintln!("  {:<16} starts at epoch {:>5}, CN0 on {}/{} epochs", d.label, offset, cn0_epochs, window.common_epoch_count);
			}

			match serde_json::to_string_pretty(&report) {
				Ok(json) => println!("{}", json),
				Err(e) => {
					eprintln!("{}", format!("Unable to serialize results: {}", e).red());
					std::process::exit(1);
				}
			}
		},
		Err(e) => {
			eprintln!("{}", format!("{}", e).red());
			std::process::exit(1);
		}
	}

}

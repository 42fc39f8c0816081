use clap::{Arg, ArgAction, Command as ClapCommand};
use log::error;
use std::process;

// Import from your library
use hotspotkit::commands::{CommandFactory, HotspotkitCommandFactory};
use hotspotkit::utils::logger::Logger;

fn main() {
    let matches = ClapCommand::new("HotspotKit")
        .version("0.1")
        .about("Detect thermal hotspots in single-band LST GeoTIFF rasters")
        .arg(
            Arg::new("input")
                .help("Input GeoTIFF file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("analyze")
                .short('a')
                .long("analyze")
                .help("Print raster structure instead of running detection")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .help("Detection mode: percentile or iqr")
                .value_name("MODE")
                .default_value("percentile")
                .required(false),
        )
        .arg(
            Arg::new("percentile")
                .short('p')
                .long("percentile")
                .help("Upper percentile limit for percentile mode (0-100)")
                .value_name("PERCENT")
                .required(false),
        )
        .arg(
            Arg::new("iqr-multiplier")
                .long("iqr-multiplier")
                .help("IQR multiplier for iqr mode (>= 0)")
                .value_name("FACTOR")
                .required(false),
        )
        .arg(
            Arg::new("region")
                .short('r')
                .long("region")
                .help("WKT POLYGON file restricting analysis to a region of interest")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("nodata")
                .long("nodata")
                .help("Override the raster's declared no-data value")
                .value_name("VALUE")
                .required(false),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Write detected hotspots to this file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .help("Output format for hotspots (csv, json)")
                .value_name("FORMAT")
                .default_value("csv")
                .required(false),
        )
        .arg(
            Arg::new("mask")
                .long("mask")
                .help("Write a grayscale hotspot mask image to this file")
                .value_name("FILE")
                .required(false),
        )
        .get_matches();

    let log_file = "hotspotkit.log";
    let logger = match Logger::new(log_file) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = Logger::init_global_logger("hotspotkit-global.log") {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let factory = HotspotkitCommandFactory::new();

    let command_result = factory.create_command(&matches, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}

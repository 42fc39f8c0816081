//! CLI command implementations
//!
//! This module contains implementations of the commands supported by
//! the CLI application using the Command pattern.

pub mod command_traits;
pub mod analyze_command;
pub mod detect_command;

pub use command_traits::{Command, CommandFactory};
pub use analyze_command::AnalyzeCommand;
pub use detect_command::DetectCommand;

use clap::ArgMatches;
use crate::raster::errors::HotspotResult;
use crate::utils::logger::Logger;

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the command-line arguments and creates
/// the appropriate command instance for execution.
pub struct HotspotkitCommandFactory;

impl HotspotkitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        HotspotkitCommandFactory
    }
}

impl Default for HotspotkitCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CommandFactory<'a> for HotspotkitCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> HotspotResult<Box<dyn Command + 'a>> {
        // Structure inspection is opt-in; detection is the default
        if args.get_flag("analyze") {
            Ok(Box::new(AnalyzeCommand::new(args, logger)?))
        } else {
            Ok(Box::new(DetectCommand::new(args, logger)?))
        }
    }
}

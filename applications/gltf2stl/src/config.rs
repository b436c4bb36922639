use std::{
    env,
    ffi::{OsStr, OsString},
    path::PathBuf,
};

use lib_stl::StlFormat;
use pico_args::Arguments;

use crate::{ApplicationError, ApplicationResult};

/// Printed for `--help` and after argument errors.
pub const USAGE: &str = "\
Converts every .glb/.gltf file below ROOT into a sibling .stl file.

The models are turned from Y-up to Z-up, flipped upside down and scaled from meters to millimeters.

USAGE:
    gltf2stl [OPTIONS] [ROOT]
    gltf2stl [OPTIONS] -- ROOT

ARGS:
    <ROOT>          directory to search (default: the current directory);
                    put it after `--` if it starts with a dash

OPTIONS:
    --ascii         write ASCII instead of binary STL
    --keep-going    skip files that fail instead of stopping at the first one
    -h, --help      print this help
";

/// Settings of one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory that is searched recursively.
    pub root: PathBuf,
    /// Encoding of the written files.
    pub format: StlFormat,
    /// Skip failing files instead of aborting.
    pub keep_going: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            format: StlFormat::Binary,
            keep_going: false,
        }
    }
}

/// What the command line asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Convert all files as configured.
    Run(Config),
    /// Print usage and exit.
    Help,
}

impl Command {
    /// Parses the arguments of the current process.
    ///
    /// # Errors
    ///
    /// See [`Command::parse`].
    pub fn from_env() -> ApplicationResult<Self> {
        Self::parse(env::args_os().skip(1).collect())
    }

    /// Parses `arguments`, not including the program name.
    ///
    /// # Errors
    ///
    /// Fails on unknown flags and on more than one positional argument.
    pub fn parse(mut arguments: Vec<OsString>) -> ApplicationResult<Self> {
        // everything after `--` is positional
        let trailing: Vec<OsString> = match arguments.iter().position(|argument| argument == "--") {
            Some(separator) => arguments.split_off(separator).into_iter().skip(1).collect(),
            None => Vec::new(),
        };
        let mut arguments = Arguments::from_vec(arguments);

        if arguments.contains(["-h", "--help"]) {
            return Ok(Self::Help);
        }

        let format = if arguments.contains("--ascii") {
            StlFormat::Ascii
        } else {
            StlFormat::Binary
        };
        let keep_going = arguments.contains("--keep-going");

        let mut root = arguments.opt_free_from_os_str(parse_root)?;
        if let Some(root) = &root {
            reject_flag(root.as_os_str())?;
        }

        let mut unexpected = arguments.finish().into_iter();
        let mut trailing = trailing.into_iter();
        if root.is_none() {
            root = trailing.next().map(PathBuf::from);
        }
        if let Some(unexpected) = unexpected.next().or_else(|| trailing.next()) {
            return Err(ApplicationError::UnknownArgument(
                unexpected.to_string_lossy().into_owned(),
            ));
        }

        let defaults = Config::default();
        Ok(Self::Run(Config {
            root: root.unwrap_or(defaults.root),
            format,
            keep_going,
        }))
    }
}

#[expect(
    clippy::unnecessary_wraps,
    reason = "pico-args expects a fallible parser"
)]
fn parse_root(argument: &OsStr) -> Result<PathBuf, String> {
    Ok(PathBuf::from(argument))
}

fn reject_flag(argument: &OsStr) -> ApplicationResult<()> {
    if argument.as_encoded_bytes().starts_with(b"-") {
        Err(ApplicationError::UnknownArgument(
            argument.to_string_lossy().into_owned(),
        ))
    } else {
        Ok(())
    }
}

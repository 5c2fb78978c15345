use std::fmt;
use std::path::PathBuf;

use once_cell::sync::Lazy;

macro_rules! exit {
    ($code:expr => $($arg:tt)*) => {{
        eprintln!($($arg)*);
        std::process::exit($code);
    }};
}

pub const HELP: &str = "OVERVIEW: x86 protected mode decoder

USAGE: xdis [options] <HEX>...

OPTIONS:
  -H, --help          Print usage information
  -F, --file          Decode a file (raw bytes, or the text sections of an x86 object)
  -C, --config        Path to config used for decoding
  -V, --validate      Rebuild the listing as an Assembly and validate it
  -B, --debug         Print the decoder log after decoding";

const NAMES: &[&str] = &["--help", "--file", "--config", "--validate", "--debug"];

pub static ARGS: Lazy<Cli> = Lazy::new(Cli::parse);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cli {
    /// Hex encoded machine code given on the command line.
    pub hex: Vec<String>,

    /// Path to a file being decoded.
    pub file: Option<PathBuf>,

    /// Optional path to config.
    pub config: Option<PathBuf>,

    /// Validate the decoded instructions.
    pub validate: bool,

    /// Print the log once done.
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Usage was asked for.
    Help,
    Unknown {
        arg: String,
        guess: Option<&'static str>,
    },
    MissingValue(&'static str),
    MissingInput,
    /// Both hex and a file were given.
    Conflict,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Help => f.write_str(HELP),
            Error::Unknown {
                arg,
                guess: Some(guess),
            } => write!(f, "Unknown cmd arg '{arg}' did you mean '{guess}'?"),
            Error::Unknown { arg, guess: None } => {
                write!(f, "Unknown cmd arg '{arg}' was entered.")
            }
            Error::MissingValue(flag) => write!(f, "Missing path after '{flag}'."),
            Error::MissingInput => write!(f, "Missing hex or a file to decode.\n\n{HELP}"),
            Error::Conflict => write!(f, "Either give hex or a file, not both.\n\n{HELP}"),
        }
    }
}

impl std::error::Error for Error {}

impl Cli {
    pub fn parse() -> Self {
        match Self::parse_from(std::env::args().skip(1)) {
            Ok(cli) => cli,
            Err(Error::Help) => exit!(0 => "{HELP}"),
            Err(err) => exit!(1 => "{err}"),
        }
    }

    pub fn parse_from<I: IntoIterator<Item = String>>(args: I) -> Result<Self, Error> {
        let mut cli = Cli::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-H" | "--help" => return Err(Error::Help),
                "-F" | "--file" => {
                    let path = args.next().ok_or(Error::MissingValue("--file"))?;
                    cli.file = Some(PathBuf::from(path));
                }
                "-C" | "--config" => {
                    let path = args.next().ok_or(Error::MissingValue("--config"))?;
                    cli.config = Some(PathBuf::from(path));
                }
                "-V" | "--validate" => cli.validate = true,
                "-B" | "--debug" => cli.debug = true,
                unknown if unknown.starts_with('-') => {
                    return Err(Error::Unknown {
                        arg: unknown.to_string(),
                        guess: suggest(unknown),
                    })
                }
                _ => cli.hex.push(arg),
            }
        }

        cli.validate_args()?;
        Ok(cli)
    }

    fn validate_args(&self) -> Result<(), Error> {
        match (self.hex.is_empty(), self.file.is_some()) {
            (true, false) => Err(Error::MissingInput),
            (false, true) => Err(Error::Conflict),
            _ => Ok(()),
        }
    }
}

/// The flag closest to `unknown`, if any is close enough to be a typo.
fn suggest(unknown: &str) -> Option<&'static str> {
    let mut distance = u32::MAX;
    let mut best_guess = "";
    for name in NAMES {
        let d = triple_accel::levenshtein_exp(unknown.as_bytes(), name.as_bytes());
        if d < distance {
            distance = d;
            best_guess = name;
        }
    }

    // A guess that's less than 4 `steps` away from a correct arg.
    (distance < 4).then_some(best_guess)
}

use std::fmt;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::Deserialize;
use x86::Extensions;

pub static CONFIG: Lazy<Config> = Lazy::new(Config::parse);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default = "defaults::decoder")]
    pub decoder: DecoderConfig,
    #[serde(default = "defaults::log")]
    pub log: LogConfig,
    /// Validate decoded listings without being asked to on the command line.
    #[serde(default = "defaults::validate")]
    pub validate: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecoderConfig {
    #[serde(default = "defaults::extensions", deserialize_with = "extensions")]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogConfig {
    /// Mirror log lines to stderr as they are written.
    #[serde(default = "defaults::echo")]
    pub echo: bool,
    /// Number of the most recent log lines printed by `--debug`.
    #[serde(default = "defaults::lines")]
    pub lines: usize,
}

#[derive(Debug)]
pub enum Error {
    /// There's no per-user data directory to look for a config in.
    NoDataDir,
    Io(PathBuf, std::io::Error),
    Parse(serde_yaml::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoDataDir => f.write_str("no data directory is set"),
            Error::Io(path, err) => write!(f, "failed to read {path:?}: {err}"),
            Error::Parse(err) => write!(f, "failed to parse config: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// Default values for anything missing from config.yaml.
mod defaults {
    use x86::Extensions;

    pub fn decoder() -> super::DecoderConfig {
        super::DecoderConfig {
            extensions: extensions(),
        }
    }
    pub fn log() -> super::LogConfig {
        super::LogConfig {
            echo: echo(),
            lines: lines(),
        }
    }

    pub fn extensions() -> Extensions {
        Extensions::all()
    }
    pub fn echo() -> bool {
        false
    }
    pub fn lines() -> usize {
        300
    }
    pub fn validate() -> bool {
        false
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decoder: defaults::decoder(),
            log: defaults::log(),
            validate: defaults::validate(),
        }
    }
}

impl Config {
    /// Location of the per-user config.
    pub fn path() -> Result<PathBuf, Error> {
        let mut dir = dirs::data_dir().ok_or(Error::NoDataDir)?;
        dir.push("xdis");
        dir.push("config.yaml");
        Ok(dir)
    }

    /// Read the per-user config. Anything that goes wrong is logged and defaults are used.
    pub fn parse() -> Self {
        let path = match Self::path() {
            Ok(path) => path,
            Err(err) => {
                log::warn!("{err}, using the default config.");
                return Self::default();
            }
        };

        // not having a config is fine
        if !path.exists() {
            return Self::default();
        }

        Self::load(&path)
    }

    /// Read the config at `path`. Anything that goes wrong is logged and defaults are used.
    pub fn load(path: &Path) -> Self {
        match Self::from_path(path) {
            Ok(config) => {
                log::trace!("loaded config from {path:?}.");
                config
            }
            Err(err) => {
                log::warn!("{err}.");

                // parse everything as default
                Self::default()
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path).map_err(|err| Error::Io(path.to_owned(), err))?;
        raw.parse()
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        // an empty document isn't a mapping
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(raw).map_err(Error::Parse)
    }
}

/// Accepts `all`, `none`, a single extension name or a list of names, ignoring case.
fn extensions<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Extensions, D::Error> {
    struct ExtensionParsing;

    fn by_name<E: de::Error>(name: &str) -> Result<Extensions, E> {
        Extensions::all()
            .iter_names()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, ext)| ext)
            .ok_or_else(|| E::custom(format!("unknown extension '{name}'")))
    }

    impl<'de> Visitor<'de> for ExtensionParsing {
        type Value = Extensions;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("expected 'all', 'none' or a list of extension names")
        }

        fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
            if s.eq_ignore_ascii_case("all") {
                return Ok(Extensions::all());
            }

            if s.eq_ignore_ascii_case("none") {
                return Ok(Extensions::empty());
            }

            by_name(s)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut extensions = Extensions::empty();
            while let Some(name) = seq.next_element::<String>()? {
                extensions |= by_name(&name)?;
            }

            Ok(extensions)
        }
    }

    deserializer.deserialize_any(ExtensionParsing)
}

//! String option surface for descriptors.
//!
//! This module lets a descriptor be configured from `key=value` pairs, e.g.
//! from a benchmark's command line or a config file. Recognised keys:
//!
//! | key | values |
//! |-----|--------|
//! | `direction` | `push`, `pull`, `pushpull` |
//! | `load_balance` | `simple`, `twc`, `merge` |
//! | `switchpoint` | float in `[0, 1]` |
//! | `tolerance` | non-negative float |
//! | `debug` | `true`, `false` |
//! | `nthreads` | positive integer |
//! | `inp0`, `inp1` | `default`, `transpose` |
//! | `mask` | `default`, `complement` |

use std::fmt;
use std::str::FromStr;

use crate::config::descriptor::{Descriptor, Direction, Input, LoadBalance, MaskMode, TransposeMode};
use crate::error::GrbError;

fn bad_value(key: &str, value: &str) -> GrbError {
    GrbError::InvalidValue(format!("unrecognised value {value:?} for option {key:?}"))
}

impl FromStr for Direction {
    type Err = GrbError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "push" | "pushonly" => Ok(Direction::PushOnly),
            "pull" | "pullonly" => Ok(Direction::PullOnly),
            "pushpull" => Ok(Direction::PushPull),
            _ => Err(bad_value("direction", s)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::PushOnly => "push",
            Direction::PullOnly => "pull",
            Direction::PushPull => "pushpull",
        })
    }
}

impl FromStr for LoadBalance {
    type Err = GrbError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(LoadBalance::Simple),
            "twc" | "thread_warp_block" => Ok(LoadBalance::ThreadWarpBlock),
            "merge" | "merge_path" => Ok(LoadBalance::Merge),
            _ => Err(bad_value("load_balance", s)),
        }
    }
}

impl fmt::Display for LoadBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoadBalance::Simple => "simple",
            LoadBalance::ThreadWarpBlock => "twc",
            LoadBalance::Merge => "merge",
        })
    }
}

impl FromStr for TransposeMode {
    type Err = GrbError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(TransposeMode::Default),
            "transpose" | "tran" => Ok(TransposeMode::Transpose),
            _ => Err(bad_value("transpose", s)),
        }
    }
}

impl FromStr for MaskMode {
    type Err = GrbError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(MaskMode::Default),
            "complement" | "scmp" => Ok(MaskMode::Complement),
            _ => Err(bad_value("mask", s)),
        }
    }
}

impl Descriptor {
    /// Set one option from its string form. The descriptor is unchanged on error.
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<(), GrbError> {
        let value = value.trim();
        match key.trim() {
            "direction" => self.set_direction(value.parse()?),
            "load_balance" => self.set_load_balance(value.parse()?),
            "switchpoint" => {
                let v: f64 = value.parse().map_err(|_| bad_value(key, value))?;
                self.set_switchpoint(v)?;
            }
            "tolerance" => {
                let v: f64 = value.parse().map_err(|_| bad_value(key, value))?;
                self.set_tolerance(v)?;
            }
            "debug" => {
                let v: bool = value.parse().map_err(|_| bad_value(key, value))?;
                self.set_debug(v);
            }
            "nthreads" => {
                let v: usize = value.parse().map_err(|_| bad_value(key, value))?;
                self.set_nthreads(v)?;
            }
            "inp0" => self.set_transpose(Input::Inp0, value.parse()?),
            "inp1" => self.set_transpose(Input::Inp1, value.parse()?),
            "mask" => self.set_mask_mode(value.parse()?),
            _ => {
                return Err(GrbError::InvalidValue(format!("unknown descriptor option {key:?}")));
            }
        }
        Ok(())
    }

    /// Parse a `key=value` pair, as found on a command line.
    pub fn apply_arg(&mut self, arg: &str) -> Result<(), GrbError> {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| GrbError::InvalidValue(format!("expected key=value, got {arg:?}")))?;
        self.set_option(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_key() {
        let mut d = Descriptor::new();
        d.set_option("direction", "push").unwrap();
        d.set_option("load_balance", "twc").unwrap();
        d.set_option("switchpoint", "0.3").unwrap();
        d.set_option("tolerance", "1e-9").unwrap();
        d.set_option("debug", "true").unwrap();
        d.set_option("nthreads", "8").unwrap();
        d.set_option("inp0", "transpose").unwrap();
        d.set_option("mask", "scmp").unwrap();
        assert_eq!(d.direction(), Direction::PushOnly);
        assert_eq!(d.load_balance(), LoadBalance::ThreadWarpBlock);
        assert_eq!(d.switchpoint(), 0.3);
        assert_eq!(d.tolerance(), 1e-9);
        assert!(d.debug());
        assert_eq!(d.nthreads(), Some(8));
        assert_eq!(d.transpose(Input::Inp0), TransposeMode::Transpose);
        assert_eq!(d.mask_mode(), MaskMode::Complement);
    }

    #[test]
    fn rejects_bad_options_without_mutation() {
        let mut d = Descriptor::new();
        let before = d.clone();
        assert!(d.set_option("direction", "sideways").is_err());
        assert!(d.set_option("switchpoint", "2.0").is_err());
        assert!(d.set_option("switchpoint", "abc").is_err());
        assert!(d.set_option("colour", "red").is_err());
        assert!(d.apply_arg("direction").is_err());
        assert_eq!(d, before);
    }

    #[test]
    fn command_line_pairs() {
        let mut d = Descriptor::new();
        d.apply_arg("load_balance=simple").unwrap();
        assert_eq!(d.load_balance(), LoadBalance::Simple);
        assert_eq!(LoadBalance::Merge.to_string(), "merge");
        assert_eq!("PushPull".parse::<Direction>().unwrap(), Direction::PushPull);
    }
}

//! Receiver (antenna + polarisation) identities.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReceiverError {
    #[error("Receiver string needs to be like e.g. \"m063v\", got {0:?}")]
    Format(String),
}

/// One of the two polarisations recorded per dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarisation {
    H,
    V,
}

impl Polarisation {
    /// The single-character symbol used in receiver names.
    pub fn symbol(self) -> char {
        match self {
            Polarisation::H => 'h',
            Polarisation::V => 'v',
        }
    }
}

/// A single receiver: one polarisation of one dish.
///
/// The canonical string form is the antenna name followed by the
/// polarisation symbol, e.g. "m063v". Receivers are cheap to copy, compare
/// and hash, so callers can use them as map and set keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Receiver {
    pub antenna_number: u32,
    pub polarisation: Polarisation,
}

impl Receiver {
    pub fn new(antenna_number: u32, polarisation: Polarisation) -> Receiver {
        Receiver {
            antenna_number,
            polarisation,
        }
    }

    /// The name of the dish this receiver belongs to, e.g. "m063".
    pub fn antenna_name(&self) -> String {
        format!("m{:03}", self.antenna_number)
    }

    /// The canonical receiver name, e.g. "m063v".
    pub fn name(&self) -> String {
        format!("{}{}", self.antenna_name(), self.polarisation.symbol())
    }
}

impl fmt::Display for Receiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Receiver {
    type Err = ReceiverError;

    /// Parses e.g. "m063v". The string must be exactly 5 characters, start
    /// with 'm' and end in one of the two polarisation symbols.
    fn from_str(s: &str) -> Result<Receiver, ReceiverError> {
        let bad = || ReceiverError::Format(s.to_string());
        if s.len() != 5 || !s.starts_with('m') {
            return Err(bad());
        }
        let polarisation = match s.as_bytes()[4] {
            b'h' => Polarisation::H,
            b'v' => Polarisation::V,
            _ => return Err(bad()),
        };
        let antenna_number = s
            .get(1..4)
            .and_then(|digits| digits.parse().ok())
            .ok_or_else(bad)?;
        Ok(Receiver {
            antenna_number,
            polarisation,
        })
    }
}

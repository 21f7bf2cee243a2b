//! Star/delta winding topology.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MachineError;

/// Three-phase winding connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connection {
    /// Star (wye)
    #[serde(rename = "Y", alias = "y")]
    Star,
    /// Delta
    #[serde(rename = "D", alias = "d")]
    Delta,
}

impl Connection {
    /// Single-letter code used on nameplates and in audit text.
    pub fn code(self) -> &'static str {
        match self {
            Connection::Star => "Y",
            Connection::Delta => "D",
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Connection {
    type Err = MachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "Y" => Ok(Connection::Star),
            "D" => Ok(Connection::Delta),
            _ => Err(MachineError::InvalidConnectionTarget {
                value: s.to_string(),
            }),
        }
    }
}

/// Requested change of the rotor winding connection (slip-ring machines).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotorReconnection {
    /// Leave the rotor winding as built.
    #[default]
    Keep,
    /// Y --> D: rotor voltage divided by √3.
    StarToDelta,
    /// D --> Y: rotor voltage multiplied by √3.
    DeltaToStar,
}

impl RotorReconnection {
    pub fn label(self) -> &'static str {
        match self {
            RotorReconnection::Keep => "Do not change",
            RotorReconnection::StarToDelta => "Y --> D",
            RotorReconnection::DeltaToStar => "D --> Y",
        }
    }
}

impl fmt::Display for RotorReconnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RotorReconnection {
    type Err = MachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '>' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "keep" | "donotchange" => Ok(RotorReconnection::Keep),
            "yd" | "startodelta" => Ok(RotorReconnection::StarToDelta),
            "dy" | "deltatostar" => Ok(RotorReconnection::DeltaToStar),
            _ => Err(MachineError::InvalidRotorReconnection {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_connection_codes() {
        assert_eq!("Y".parse::<Connection>().unwrap(), Connection::Star);
        assert_eq!(" d ".parse::<Connection>().unwrap(), Connection::Delta);
    }

    #[test]
    fn invalid_connection_is_typed_error() {
        let err = "X".parse::<Connection>().unwrap_err();
        assert!(matches!(err, MachineError::InvalidConnectionTarget { .. }));
    }

    #[test]
    fn parse_rotor_reconnection_labels() {
        assert_eq!(
            "Do not change".parse::<RotorReconnection>().unwrap(),
            RotorReconnection::Keep
        );
        assert_eq!(
            "Y --> D".parse::<RotorReconnection>().unwrap(),
            RotorReconnection::StarToDelta
        );
        assert_eq!(
            "delta_to_star".parse::<RotorReconnection>().unwrap(),
            RotorReconnection::DeltaToStar
        );
        assert!("sideways".parse::<RotorReconnection>().is_err());
    }

    #[test]
    fn labels_round_trip_through_from_str() {
        for r in [
            RotorReconnection::Keep,
            RotorReconnection::StarToDelta,
            RotorReconnection::DeltaToStar,
        ] {
            assert_eq!(r.label().parse::<RotorReconnection>().unwrap(), r);
        }
    }
}

//! Raw pointer events
//!
//! Position is irrelevant to capture logic, so events carry no payload.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A low-level pointer event forwarded from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEvent {
    Down,
    Move,
    Up,
}

impl std::fmt::Display for PointerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointerEvent::Down => write!(f, "down"),
            PointerEvent::Move => write!(f, "move"),
            PointerEvent::Up => write!(f, "up"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pointer event {0:?}, expected down, move or up")]
pub struct ParsePointerError(pub String);

impl FromStr for PointerEvent {
    type Err = ParsePointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "down" | "d" | "press" => Ok(PointerEvent::Down),
            "move" | "m" => Ok(PointerEvent::Move),
            "up" | "u" | "release" => Ok(PointerEvent::Up),
            other => Err(ParsePointerError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("down".parse::<PointerEvent>(), Ok(PointerEvent::Down));
        assert_eq!(" U \n".parse::<PointerEvent>(), Ok(PointerEvent::Up));
        assert_eq!("m".parse::<PointerEvent>(), Ok(PointerEvent::Move));
    }

    #[test]
    fn test_parse_unknown() {
        let err = "tap".parse::<PointerEvent>().unwrap_err();
        assert_eq!(err, ParsePointerError("tap".to_string()));
        assert!(err.to_string().contains("tap"));
    }

    #[test]
    fn test_deserialize_from_json() {
        let event: PointerEvent = serde_json::from_str(r#""up""#).unwrap();
        assert_eq!(event, PointerEvent::Up);
    }
}

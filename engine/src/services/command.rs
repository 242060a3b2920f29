// Chat command parsing
use super::analysis_service::helpers::normalize_coin;
use crate::error::EngineError;
use shared::models::RiskMode;
use std::fmt;

pub const DEFAULT_MODE: RiskMode = RiskMode::Safe;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Signal { coin: String, mode: RiskMode },
    Reversal { coin: String },
    Levels { coin: String },
    Scan,
    Compare { first: String, second: String },
    Help,
}

impl Command {
    /// Accepts `/signal BTC [mode]`, `/reversal BTC`, `/resistance BTC` (or `/levels`),
    /// `/scan`, `/compare BTC ETH` and `/help`. The leading slash is optional.
    pub fn parse(text: &str) -> Result<Self, EngineError> {
        let mut tokens = text.split_whitespace();
        let head = tokens
            .next()
            .ok_or_else(|| EngineError::InvalidInput("empty command".to_string()))?;
        let name = head.trim_start_matches('/').to_ascii_lowercase();
        let args: Vec<&str> = tokens.collect();

        match (name.as_str(), args.as_slice()) {
            ("signal", [coin]) => Ok(Command::Signal {
                coin: normalize_coin(coin)?,
                mode: DEFAULT_MODE,
            }),
            ("signal", [coin, mode]) => Ok(Command::Signal {
                coin: normalize_coin(coin)?,
                mode: mode.parse::<RiskMode>().map_err(EngineError::InvalidInput)?,
            }),
            ("signal", _) => Err(usage("/signal BTC [safe|balanced|aggressive]")),
            ("reversal", [coin]) => Ok(Command::Reversal {
                coin: normalize_coin(coin)?,
            }),
            ("reversal", _) => Err(usage("/reversal BTC")),
            ("resistance" | "levels", [coin]) => Ok(Command::Levels {
                coin: normalize_coin(coin)?,
            }),
            ("resistance" | "levels", _) => Err(usage("/resistance BTC")),
            ("scan", []) => Ok(Command::Scan),
            ("scan", _) => Err(usage("/scan")),
            ("compare", [first, second]) => Ok(Command::Compare {
                first: normalize_coin(first)?,
                second: normalize_coin(second)?,
            }),
            ("compare", _) => Err(EngineError::InvalidInput(
                "Please provide exactly two coins. Example: /compare BTC ETH".to_string(),
            )),
            ("help" | "start", _) => Ok(Command::Help),
            _ => Err(EngineError::InvalidInput(format!(
                "Unknown command '{}'. Try /help",
                head
            ))),
        }
    }

    /// Coins the command is about, for error messages.
    pub fn subject(&self) -> Option<String> {
        match self {
            Command::Signal { coin, .. } | Command::Reversal { coin } | Command::Levels { coin } => Some(coin.clone()),
            Command::Compare { first, second } => Some(format!("{} and {}", first, second)),
            Command::Scan | Command::Help => None,
        }
    }
}

fn usage(example: &str) -> EngineError {
    EngineError::InvalidInput(format!("Usage: {}", example))
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Signal { coin, mode } => write!(f, "/signal {} {}", coin, mode),
            Command::Reversal { coin } => write!(f, "/reversal {}", coin),
            Command::Levels { coin } => write!(f, "/resistance {}", coin),
            Command::Scan => f.write_str("/scan"),
            Command::Compare { first, second } => write!(f, "/compare {} {}", first, second),
            Command::Help => f.write_str("/help"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_defaults_to_safe_mode() {
        assert_eq!(
            Command::parse("/signal btc").unwrap(),
            Command::Signal {
                coin: "BTC".into(),
                mode: RiskMode::Safe
            }
        );
        assert_eq!(
            Command::parse("signal ETH Aggressive").unwrap(),
            Command::Signal {
                coin: "ETH".into(),
                mode: RiskMode::Aggressive
            }
        );
    }

    #[test]
    fn unknown_mode_is_invalid_input() {
        let err = Command::parse("/signal BTC yolo").unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(ref msg) if msg.contains("Unknown mode 'yolo'")));
    }

    #[test]
    fn levels_alias_and_other_commands() {
        assert_eq!(Command::parse("/levels sol").unwrap(), Command::Levels { coin: "SOL".into() });
        assert_eq!(Command::parse("/resistance SOL").unwrap(), Command::Levels { coin: "SOL".into() });
        assert_eq!(Command::parse("/reversal ada").unwrap(), Command::Reversal { coin: "ADA".into() });
        assert_eq!(Command::parse("  /SCAN  ").unwrap(), Command::Scan);
        assert_eq!(Command::parse("/help").unwrap(), Command::Help);
    }

    #[test]
    fn compare_needs_exactly_two_coins() {
        assert_eq!(
            Command::parse("/compare btc eth").unwrap(),
            Command::Compare {
                first: "BTC".into(),
                second: "ETH".into()
            }
        );
        for text in ["/compare", "/compare BTC", "/compare BTC ETH SOL"] {
            let err = Command::parse(text).unwrap_err();
            assert!(err.to_string().contains("exactly two coins"), "{}: {}", text, err);
        }
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(Command::parse("").is_err());
        assert!(Command::parse("/signal").is_err());
        assert!(Command::parse("/signal BTC-USD").is_err());
        assert!(Command::parse("/scan BTC").is_err());
        assert!(matches!(Command::parse("/moon"), Err(EngineError::InvalidInput(ref msg)) if msg.contains("/moon")));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for text in ["/signal BTC balanced", "/reversal ETH", "/resistance SOL", "/scan", "/compare BTC ETH"] {
            let command = Command::parse(text).unwrap();
            assert_eq!(command.to_string(), text);
        }
    }
}

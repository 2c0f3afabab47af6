//! Protocol constants and process configuration.

use std::time::Duration;

/// Environment variable selecting the listening port.
pub const PORT_ENV_VAR: &str = "RPS_APP_PORT";

/// Port used when `RPS_APP_PORT` is absent or non-numeric.
pub const DEFAULT_PORT: u16 = 5000;

/// Characters connect codes are drawn from.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Connect codes are exactly this many characters.
pub const CODE_LENGTH: usize = 5;

/// Bound on unique-code generation attempts before giving up.
pub const CODE_MAX_TRIES: usize = 10;

/// Ceiling on simultaneously live sessions.
pub const GAME_LIMIT: usize = 100;

/// A session is force-cancelled once it has been alive this long.
pub const GAME_LIFETIME: Duration = Duration::from_secs(3600);

/// Fixed code of the practice session seeded at startup.
pub const PRACTICE_CODE: &str = "TEST";

pub const REQUIRED_WINS_MIN: i64 = 1;
pub const REQUIRED_WINS_MAX: i64 = 10;
pub const TIME_LIMIT_MIN: i64 = 1;
pub const TIME_LIMIT_MAX: i64 = 10;

/// Resolve the listening port from the `RPS_APP_PORT` environment variable.
pub fn port_from_env() -> u16 {
    parse_port(std::env::var(PORT_ENV_VAR).ok().as_deref())
}

/// Parse a raw port value, falling back to [`DEFAULT_PORT`] when the value is
/// absent or non-numeric.
fn parse_port(raw: Option<&str>) -> u16 {
    raw.and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port_with_valid_value() {
        // given:
        let raw = Some("8080");

        // when:
        let port = parse_port(raw);

        // then:
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_port_with_missing_value_falls_back() {
        assert_eq!(parse_port(None), DEFAULT_PORT);
    }

    #[test]
    fn test_parse_port_with_non_numeric_value_falls_back() {
        assert_eq!(parse_port(Some("not-a-port")), DEFAULT_PORT);
        assert_eq!(parse_port(Some("")), DEFAULT_PORT);
        assert_eq!(parse_port(Some("70000")), DEFAULT_PORT);
    }

    #[test]
    fn test_code_alphabet_is_uppercase_letters_and_digits() {
        assert_eq!(CODE_ALPHABET.len(), 36);
        assert!(
            CODE_ALPHABET
                .iter()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }
}

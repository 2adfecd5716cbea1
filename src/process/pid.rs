//! PID parsing for `POST /tasks` and `POST /memory` bodies.

/// Body did not hold a usable process id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid PID '{0}'")]
pub struct InvalidPid(pub String);

/// Parses a request body holding a decimal PID.
///
/// Surrounding whitespace is ignored. Zero and negative values are rejected
/// because `kill(2)` treats them as process groups.
pub fn parse_pid_body(body: &str) -> Result<i32, InvalidPid> {
    let trimmed = body.trim();
    match trimmed.parse::<i32>() {
        Ok(pid) if pid > 0 => Ok(pid),
        _ => Err(InvalidPid(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pid_body_valid() {
        assert_eq!(parse_pid_body("42"), Ok(42));
        assert_eq!(parse_pid_body(" 42\n"), Ok(42));
        assert_eq!(parse_pid_body("1"), Ok(1));
    }

    #[test]
    fn test_parse_pid_body_invalid() {
        assert!(parse_pid_body("").is_err());
        assert!(parse_pid_body("abc").is_err());
        assert!(parse_pid_body("0").is_err());
        assert!(parse_pid_body("-1").is_err());
        assert!(parse_pid_body("12 34").is_err());
        assert!(parse_pid_body("99999999999").is_err());
    }

    #[test]
    fn test_invalid_pid_keeps_input() {
        assert_eq!(parse_pid_body(" abc ").unwrap_err(), InvalidPid("abc".into()));
    }
}

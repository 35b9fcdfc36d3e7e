//! `KEY=VALUE` dotfile parsing.

use thiserror::Error;

/// A non-blank, non-comment line without a usable `KEY=` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: expected KEY=VALUE, found {content:?}")]
pub struct EnvLineError {
    /// 1-based line number.
    pub line: usize,
    pub content: String,
}

/// Parse dotfile contents into ordered `(key, value)` pairs.
///
/// Blank lines and lines starting with `#` are skipped. Each remaining line is
/// trimmed and split on the first `=`, so values may themselves contain `=`.
/// A comment marker is only recognised in the first column.
pub fn parse_env_lines(contents: &str) -> Result<Vec<(String, String)>, EnvLineError> {
    let mut vars = Vec::new();
    for (idx, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || raw.starts_with('#') {
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                vars.push((key.to_string(), value.to_string()));
            }
            _ => {
                return Err(EnvLineError {
                    line: idx + 1,
                    content: raw.to_string(),
                });
            }
        }
    }
    Ok(vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn splits_on_first_equals_and_skips_comments() {
        let vars = parse_env_lines("FOO=bar\n# comment\n\nBAZ=1=2\n").expect("parse");
        assert_eq!(vars, vec![pair("FOO", "bar"), pair("BAZ", "1=2")]);
    }

    #[test]
    fn line_without_equals_is_rejected() {
        let err = parse_env_lines("FOO=bar\nNOEQUALS\n").expect_err("malformed");
        assert_eq!(
            err,
            EnvLineError {
                line: 2,
                content: "NOEQUALS".to_string()
            }
        );
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = parse_env_lines("=value").expect_err("empty key");
        assert_eq!(err.line, 1);
    }

    #[test]
    fn surrounding_whitespace_and_crlf_are_trimmed() {
        let vars = parse_env_lines("  APP_ENV=local  \r\nEMPTY=\r\n").expect("parse");
        assert_eq!(vars, vec![pair("APP_ENV", "local"), pair("EMPTY", "")]);
    }

    #[test]
    fn indented_hash_is_not_a_comment() {
        let err = parse_env_lines("  # indented").expect_err("not a comment");
        assert_eq!(err.content, "  # indented");
    }
}

//! Single-line YOLO label parsing.
//!
//! One label line is `class_id cx cy w h` with normalized coordinates.
//! Parsing is deliberately permissive about values: a negative class ID or
//! an out-of-range coordinate parses fine and is left for the validator to
//! flag, so that one malformed field produces a range finding rather than
//! masking the rest of the line.

use std::fmt;

/// One parsed annotation record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelLine {
    pub class_id: i64,
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

/// Why a line could not be parsed into a [`LabelLine`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineParseError {
    /// The line did not split into exactly 5 whitespace-separated tokens.
    TokenCount { found: usize },
    /// A token failed numeric parsing.
    BadToken { field: &'static str, token: String },
}

impl fmt::Display for LineParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineParseError::TokenCount { found } => {
                write!(f, "expected 5 values, got {}", found)
            }
            LineParseError::BadToken { field, token } => {
                write!(f, "cannot parse {} '{}'", field, token)
            }
        }
    }
}

/// Parse one label line. Blank lines yield `Ok(None)`.
pub fn parse_label_line(line: &str) -> Result<Option<LabelLine>, LineParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let found = trimmed.split_whitespace().count();
    if found != 5 {
        return Err(LineParseError::TokenCount { found });
    }

    let mut tokens = trimmed.split_whitespace();
    let class_token = tokens.next().expect("counted 5 tokens");

    let class_id = class_token
        .parse::<i64>()
        .map_err(|_| LineParseError::BadToken {
            field: "class_id",
            token: class_token.to_string(),
        })?;

    let cx = parse_f64(tokens.next().expect("counted 5 tokens"), "center_x")?;
    let cy = parse_f64(tokens.next().expect("counted 5 tokens"), "center_y")?;
    let w = parse_f64(tokens.next().expect("counted 5 tokens"), "width")?;
    let h = parse_f64(tokens.next().expect("counted 5 tokens"), "height")?;

    Ok(Some(LabelLine {
        class_id,
        cx,
        cy,
        w,
        h,
    }))
}

fn parse_f64(token: &str, field: &'static str) -> Result<f64, LineParseError> {
    token.parse::<f64>().map_err(|_| LineParseError::BadToken {
        field,
        token: token.to_string(),
    })
}

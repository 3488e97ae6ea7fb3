use thiserror::Error;

// E.164 allows at most 15 digits including the country code; anything under
// 8 is too short to be a dialable subscriber number.
const MIN_DIGITS: usize = 8;
const MAX_DIGITS: usize = 15;

/// A syntactically valid phone number in E.164 form.
///
/// Construction only succeeds through [`PhoneNumber::parse`], so holding a
/// value of this type is proof the input passed validation. Re-parsed on
/// every keystroke by the input surfaces; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber {
    e164: String,
    display: String,
}

impl PhoneNumber {
    /// Parse raw user input into a canonical phone number.
    ///
    /// Grouping characters (spaces, dashes, dots, parentheses) are ignored;
    /// the remainder must be a `+` followed by 8-15 digits with a non-zero
    /// leading digit.
    pub fn parse(input: &str) -> Result<Self, PhoneError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        let Some(rest) = trimmed.strip_prefix('+') else {
            return Err(PhoneError::MissingCountryCode);
        };

        let mut digits = String::with_capacity(rest.len());
        for ch in rest.chars() {
            match ch {
                '0'..='9' => digits.push(ch),
                ' ' | '-' | '.' | '(' | ')' => {}
                other => return Err(PhoneError::InvalidCharacter(other)),
            }
        }

        if digits.starts_with('0') {
            return Err(PhoneError::InvalidCharacter('0'));
        }
        if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
            return Err(PhoneError::InvalidLength(digits.len()));
        }

        let display = format_display(&digits);
        Ok(Self {
            e164: format!("+{digits}"),
            display,
        })
    }

    /// Canonical `+<digits>` form sent to the auth service.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// Human-readable form shown on code-entry surfaces.
    pub fn display(&self) -> &str {
        &self.display
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display)
    }
}

/// Country code length heuristic: NANP and Russia/Kazakhstan use one digit,
/// everything else in common use is two. Good enough for display grouping;
/// the canonical form is unaffected.
fn country_code_len(digits: &str) -> usize {
    match digits.as_bytes().first() {
        Some(b'1') | Some(b'7') => 1,
        _ => 2,
    }
}

fn format_display(digits: &str) -> String {
    let cc_len = country_code_len(digits);
    let (cc, national) = digits.split_at(cc_len.min(digits.len()));

    let mut out = format!("+{cc}");
    for group in group_national(national) {
        out.push(' ');
        out.push_str(group);
    }
    out
}

/// Split national digits into groups of three, widening the final group to
/// four when the remainder would otherwise leave a dangling single digit.
fn group_national(national: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut rest = national;
    while !rest.is_empty() {
        let take = if rest.len() == 4 || rest.len() <= 3 {
            rest.len()
        } else {
            3
        };
        let (group, tail) = rest.split_at(take);
        groups.push(group);
        rest = tail;
    }
    groups
}

/// Reasons a candidate phone number failed to parse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhoneError {
    #[error("phone number is empty")]
    Empty,
    #[error("phone number must start with '+' and a country code")]
    MissingCountryCode,
    #[error("phone number contains invalid character '{0}'")]
    InvalidCharacter(char),
    #[error("phone number has {0} digits, expected 8-15")]
    InvalidLength(usize),
}

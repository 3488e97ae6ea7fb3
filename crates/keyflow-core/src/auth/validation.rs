use crate::phone::PhoneNumber;

/// Inline error shown once a previously valid field turns invalid again.
pub const INVALID_NUMBER_MESSAGE: &str = "Invalid number, please try again.";

/// Feedback for the phone input surface after a keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFeedback {
    /// Parsed number when the current content is valid.
    pub phone: Option<PhoneNumber>,
    /// Inline error to display, if any.
    pub error: Option<&'static str>,
    /// Whether the continue control should be enabled.
    pub can_continue: bool,
}

/// Tracks whether a phone field has ever held a valid number.
///
/// The latch only moves false to true and never resets for the lifetime of
/// the editing session: first-pass typing stays quiet, but once the user has
/// produced a valid number, breaking it again shows an error.
#[derive(Debug, Default)]
pub struct PhoneValidation {
    ever_valid: bool,
}

impl PhoneValidation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate the current field content.
    pub fn on_input(&mut self, candidate: &str) -> InputFeedback {
        match PhoneNumber::parse(candidate) {
            Ok(phone) => {
                self.ever_valid = true;
                InputFeedback {
                    phone: Some(phone),
                    error: None,
                    can_continue: true,
                }
            }
            Err(_) => InputFeedback {
                phone: None,
                error: self.ever_valid.then_some(INVALID_NUMBER_MESSAGE),
                can_continue: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_is_quiet_before_first_valid_number() {
        let mut validation = PhoneValidation::new();
        let feedback = validation.on_input("not a number");
        assert!(feedback.phone.is_none());
        assert!(feedback.error.is_none());
        assert!(!feedback.can_continue);
    }

    #[test]
    fn latch_sets_on_valid_input_and_flags_later_breakage() {
        let mut validation = PhoneValidation::new();

        let valid = validation.on_input("+1 415 555 0100");
        assert!(valid.can_continue);
        assert!(valid.error.is_none());
        assert_eq!(valid.phone.unwrap().e164(), "+14155550100");

        let broken = validation.on_input("+1 415");
        assert!(!broken.can_continue);
        assert_eq!(broken.error, Some(INVALID_NUMBER_MESSAGE));
    }

    #[test]
    fn latch_never_resets_within_a_session() {
        let mut validation = PhoneValidation::new();
        validation.on_input("+1 415 555 0100");
        validation.on_input("");
        validation.on_input("+1 415 555 0100");
        let feedback = validation.on_input("garbage");
        assert_eq!(feedback.error, Some(INVALID_NUMBER_MESSAGE));
    }

    #[test]
    fn can_continue_tracks_current_validity_only() {
        let mut validation = PhoneValidation::new();
        validation.on_input("+1 415 555 0100");
        assert!(!validation.on_input("+1").can_continue);
        assert!(validation.on_input("+1 415 555 0100").can_continue);
    }
}

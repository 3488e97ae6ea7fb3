use std::sync::Arc;

use keyflow_core::auth::{
    AuthClient, AuthError, AuthenticatedSession, OAuthFlow, OAuthProvider, OtpFlow,
    PhoneValidation, SessionRouter,
};
use keyflow_core::phone::PhoneNumber;
use keyflow_core::presenter::{identity_rows, ContentRow};

const MAX_CODE_LEN: usize = 10;

/// Which surface is currently presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    CodeEntry,
    LoggedIn,
}

/// Focused control on the sign-in screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Providers,
    Phone,
}

pub struct App<C> {
    router: SessionRouter<C>,
    otp: OtpFlow<C>,
    oauth: OAuthFlow<C>,

    validation: PhoneValidation,
    phone_input: String,
    phone: Option<PhoneNumber>,
    phone_error: Option<&'static str>,

    code_input: String,
    code_error: Option<String>,

    focus: Focus,
    provider_index: usize,
    oauth_busy: bool,

    rows: Vec<ContentRow>,
    selected_row: usize,

    status: String,
}

impl<C: AuthClient> App<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            router: SessionRouter::new(client.clone()),
            otp: OtpFlow::new(client.clone()),
            oauth: OAuthFlow::new(client),
            validation: PhoneValidation::new(),
            phone_input: String::new(),
            phone: None,
            phone_error: None,
            code_input: String::new(),
            code_error: None,
            focus: Focus::Phone,
            provider_index: 0,
            oauth_busy: false,
            rows: Vec::new(),
            selected_row: 0,
            status: HOME_HELP.into(),
        }
    }

    pub fn screen(&self) -> AppScreen {
        if self.router.is_logged_in() {
            AppScreen::LoggedIn
        } else if self.otp.challenge().is_some() {
            AppScreen::CodeEntry
        } else {
            AppScreen::Home
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Providers => Focus::Phone,
            Focus::Phone => Focus::Providers,
        };
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    /// Any service call pending; the triggering controls stay disabled.
    pub fn busy(&self) -> bool {
        self.oauth_busy || self.otp.in_flight()
    }

    // --- sign-in screen -------------------------------------------------

    pub fn phone_input(&self) -> &str {
        &self.phone_input
    }

    pub fn phone_error(&self) -> Option<&'static str> {
        self.phone_error
    }

    pub fn can_continue(&self) -> bool {
        self.phone.is_some() && !self.busy()
    }

    pub fn push_phone_char(&mut self, ch: char) {
        self.phone_input.push(ch);
        self.revalidate_phone();
    }

    pub fn pop_phone_char(&mut self) {
        self.phone_input.pop();
        self.revalidate_phone();
    }

    // Every keystroke re-parses; the latch inside `validation` decides
    // whether invalid input deserves an inline error yet.
    fn revalidate_phone(&mut self) {
        let feedback = self.validation.on_input(&self.phone_input);
        self.phone = feedback.phone;
        self.phone_error = feedback.error;
    }

    pub fn providers(&self) -> [OAuthProvider; 2] {
        OAuthProvider::all()
    }

    pub fn provider_index(&self) -> usize {
        self.provider_index
    }

    pub fn move_provider_selection(&mut self, delta: isize) {
        let len = self.providers().len() as isize;
        let next = (self.provider_index as isize + delta).rem_euclid(len);
        self.provider_index = next as usize;
    }

    pub fn selected_provider(&self) -> OAuthProvider {
        self.providers()[self.provider_index]
    }

    /// Run the third-party flow for the selected provider.
    pub async fn start_oauth(&mut self) {
        if self.busy() {
            return;
        }
        let provider = self.selected_provider();
        self.oauth_busy = true;
        self.set_status(format!("Contacting {provider}…"));

        let result = self.oauth.start(provider).await;
        self.oauth_busy = false;
        match result {
            Ok(outcome) => {
                let greeting = outcome.completion.greeting();
                self.log_in_with(outcome.session, greeting);
            }
            Err(err) => {
                self.set_status(format!("{provider} sign-in failed: {err}"));
            }
        }
    }

    /// Request a one-time code for the entered number.
    ///
    /// Without a valid number this is a no-op beyond a status hint; the
    /// request itself only ever sees a parsed `PhoneNumber`.
    pub async fn submit_phone(&mut self) {
        if self.busy() {
            return;
        }
        let Some(phone) = self.phone.clone() else {
            self.set_status("Enter a valid phone number first");
            return;
        };
        self.set_status(format!("Sending code to {}…", phone.display()));
        let result = self.otp.request_code(phone).await;
        match result {
            Ok(challenge) => {
                self.code_input.clear();
                self.code_error = None;
                self.set_status(format!("Code sent to {}", challenge.phone.display()));
            }
            Err(err) => {
                self.set_status(format!("Could not send code: {err}"));
            }
        }
    }

    // --- code-entry screen ----------------------------------------------

    pub fn code_input(&self) -> &str {
        &self.code_input
    }

    pub fn code_error(&self) -> Option<&str> {
        self.code_error.as_deref()
    }

    pub fn challenge_phone_display(&self) -> Option<String> {
        self.otp
            .challenge()
            .map(|challenge| challenge.phone.display().to_owned())
    }

    /// Seconds until the pending challenge expires, clamped to zero.
    pub fn challenge_remaining_secs(&self) -> Option<i64> {
        self.otp
            .challenge()
            .map(|challenge| challenge.remaining().num_seconds())
    }

    pub fn push_code_char(&mut self, ch: char) {
        if ch.is_ascii_digit() && self.code_input.len() < MAX_CODE_LEN {
            self.code_input.push(ch);
        }
    }

    pub fn pop_code_char(&mut self) {
        self.code_input.pop();
    }

    pub async fn submit_code(&mut self) {
        if self.busy() || self.code_input.is_empty() {
            return;
        }
        let code = self.code_input.clone();
        let result = self.otp.verify(&code).await;
        match result {
            Ok(session) => {
                self.code_input.clear();
                self.code_error = None;
                self.log_in_with(session, "You're logged in!");
            }
            Err(err @ AuthError::CodeExpired) => {
                // The flow dropped the challenge; we are back on the sign-in
                // screen and the user has to request a fresh code.
                self.code_input.clear();
                self.code_error = None;
                self.set_status(format!("{err}"));
            }
            Err(err) => {
                self.code_error = Some(format!("{err}"));
            }
        }
    }

    /// Request a fresh code for the same number, replacing the challenge.
    pub async fn resend_code(&mut self) {
        if self.busy() {
            return;
        }
        let Some(phone) = self.otp.challenge().map(|c| c.phone.clone()) else {
            return;
        };
        let result = self.otp.request_code(phone).await;
        match result {
            Ok(challenge) => {
                self.code_input.clear();
                self.code_error = None;
                self.set_status(format!("New code sent to {}", challenge.phone.display()));
            }
            Err(err) => {
                self.code_error = Some(format!("{err}"));
            }
        }
    }

    /// Dismiss the code-entry surface, dropping the pending challenge.
    pub fn dismiss_code_entry(&mut self) {
        self.otp.cancel();
        self.code_input.clear();
        self.code_error = None;
        self.set_status(HOME_HELP);
    }

    // --- logged-in screen -----------------------------------------------

    pub fn rows(&self) -> &[ContentRow] {
        &self.rows
    }

    pub fn selected_row(&self) -> usize {
        self.selected_row
    }

    pub fn move_row_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() as isize - 1;
        let next = (self.selected_row as isize + delta).clamp(0, last);
        self.selected_row = next as usize;
    }

    fn log_in_with(&mut self, session: AuthenticatedSession, greeting: &str) {
        self.rows = identity_rows(&session.user);
        self.selected_row = 0;
        self.router.log_in(session);
        self.set_status(format!("{greeting}  ('l' to log out)"));
    }

    /// Revoke and return to the sign-in screen. The input surface is
    /// recreated, so the validation latch resets with it.
    pub async fn log_out(&mut self) {
        self.router.log_out().await;
        self.rows.clear();
        self.selected_row = 0;
        self.validation = PhoneValidation::new();
        self.phone_input.clear();
        self.phone = None;
        self.phone_error = None;
        self.focus = Focus::Phone;
        self.set_status(HOME_HELP);
    }
}

const HOME_HELP: &str =
    "Tab switches focus, Enter activates, Esc quits";

//! Form state and validation for the submission, login and report flows.

use crate::FetchFailure;

pub const MIN_MESSAGE_CHARS: usize = 50;
pub const MAX_MESSAGE_CHARS: usize = 1000;
pub const MIN_REPORT_EMAIL_CHARS: usize = 3;
pub const MAX_REPORT_EMAIL_CHARS: usize = 50;
pub const MAX_REPORT_DETAILS_CHARS: usize = 1000;

/// Letter ready to be posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterDraft {
    pub author: String,
    pub message: String,
    pub secret: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionDiagnostic {
    pub message: String,
    pub author_invalid: bool,
    pub message_invalid: bool,
}

impl SubmissionDiagnostic {
    fn new(message: &str, author_invalid: bool, message_invalid: bool) -> Self {
        Self {
            message: message.to_string(),
            author_invalid,
            message_invalid,
        }
    }

    pub fn is_clear(&self) -> bool {
        self.message.is_empty() && !self.author_invalid && !self.message_invalid
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionForm {
    pub(crate) author: String,
    pub(crate) message: String,
    pub(crate) secret: bool,
    pub(crate) diagnostic: SubmissionDiagnostic,
    pub(crate) pending: bool,
    pub(crate) submitted: bool,
}

impl SubmissionForm {
    pub fn validate(&self) -> Result<LetterDraft, SubmissionDiagnostic> {
        let no_author = self.author.trim().is_empty();
        let no_message = self.message.trim().is_empty();
        let diagnostic = match (no_author, no_message) {
            (true, true) => Some(SubmissionDiagnostic::new(
                "Both fields are required",
                true,
                true,
            )),
            (true, false) => Some(SubmissionDiagnostic::new("Author is required", true, false)),
            (false, true) => Some(SubmissionDiagnostic::new("Message is required", false, true)),
            (false, false) => None,
        };
        if let Some(diagnostic) = diagnostic {
            return Err(diagnostic);
        }

        let chars = self.message.chars().count();
        if chars < MIN_MESSAGE_CHARS {
            return Err(SubmissionDiagnostic::new(
                "Message is short to send a letter!",
                false,
                true,
            ));
        }
        if chars > MAX_MESSAGE_CHARS {
            return Err(SubmissionDiagnostic::new(
                "Message is too long to send a letter!",
                false,
                true,
            ));
        }

        Ok(LetterDraft {
            author: self.author.clone(),
            message: self.message.clone(),
            secret: self.secret,
        })
    }

    pub(crate) fn apply_outcome(&mut self, outcome: Result<(), FetchFailure>) {
        self.pending = false;
        match outcome {
            Ok(()) => {
                self.diagnostic = SubmissionDiagnostic::default();
                self.submitted = true;
            }
            Err(failure) => {
                let message = match &failure {
                    FetchFailure::RateLimited => "You're being ratelimited!".to_string(),
                    other => other
                        .server_message()
                        .unwrap_or("Something wrong with your input, please try again")
                        .to_string(),
                };
                self.diagnostic = SubmissionDiagnostic {
                    message,
                    author_invalid: false,
                    message_invalid: false,
                };
            }
        }
    }
}

/// Flags granted by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginGrant {
    pub moderator: bool,
    pub viewer: bool,
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginDiagnostic {
    pub why: String,
    pub username_invalid: bool,
    pub password_invalid: bool,
}

impl LoginDiagnostic {
    fn api(why: impl Into<String>) -> Self {
        Self {
            why: why.into(),
            username_invalid: false,
            password_invalid: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginForm {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) diagnostic: Option<LoginDiagnostic>,
    pub(crate) pending: bool,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(String, String), LoginDiagnostic> {
        let no_username = self.username.is_empty();
        let no_password = self.password.is_empty();
        let why = match (no_username, no_password) {
            (true, true) => "Both fields are required",
            (true, false) => "Username is required",
            (false, true) => "Password is required",
            (false, false) => return Ok((self.username.clone(), self.password.clone())),
        };
        Err(LoginDiagnostic {
            why: why.to_string(),
            username_invalid: no_username,
            password_invalid: no_password,
        })
    }

    pub(crate) fn apply_failure(&mut self, failure: &FetchFailure) {
        self.pending = false;
        let diagnostic = match failure {
            FetchFailure::RateLimited => LoginDiagnostic::api("You're being ratelimited"),
            FetchFailure::Server { .. } => LoginDiagnostic::api(
                failure
                    .server_message()
                    .unwrap_or("Something wrong with the server, please try again later"),
            ),
            FetchFailure::Network(_) | FetchFailure::Malformed(_) | FetchFailure::Cancelled => {
                LoginDiagnostic::api("Unexpected error occurred. Please try to login again later")
            }
        };
        self.diagnostic = Some(diagnostic);
    }
}

/// Categories accepted by the report endpoint, with their wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Spam,
    Abuse,
    BugReport,
    TechnicalIssue,
    Profanity,
    Bullying,
    InappropriateContent,
    Nsfw,
    Scam,
    Irrelevant,
    Others,
}

impl ReportKind {
    pub const ALL: [ReportKind; 11] = [
        ReportKind::Spam,
        ReportKind::Abuse,
        ReportKind::BugReport,
        ReportKind::TechnicalIssue,
        ReportKind::Profanity,
        ReportKind::Bullying,
        ReportKind::InappropriateContent,
        ReportKind::Nsfw,
        ReportKind::Scam,
        ReportKind::Irrelevant,
        ReportKind::Others,
    ];

    pub fn code(self) -> i32 {
        match self {
            ReportKind::Spam => 1,
            ReportKind::Abuse => 2,
            ReportKind::BugReport => 3,
            ReportKind::TechnicalIssue => 4,
            ReportKind::Profanity => 5,
            ReportKind::Bullying => 6,
            ReportKind::InappropriateContent => 7,
            ReportKind::Nsfw => 8,
            ReportKind::Scam => 9,
            ReportKind::Irrelevant => 10,
            ReportKind::Others => 11,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportKind::Spam => "spam",
            ReportKind::Abuse => "abuse",
            ReportKind::BugReport => "bug",
            ReportKind::TechnicalIssue => "technical",
            ReportKind::Profanity => "profanity",
            ReportKind::Bullying => "bullying",
            ReportKind::InappropriateContent => "inappropriate",
            ReportKind::Nsfw => "nsfw",
            ReportKind::Scam => "scam",
            ReportKind::Irrelevant => "irrelevant",
            ReportKind::Others => "others",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(label))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
    pub letter_id: String,
    pub email: String,
    pub kind: ReportKind,
    pub details: String,
}

impl ReportDraft {
    pub fn validate(&self) -> Result<(), &'static str> {
        let email = self.email.trim().chars().count();
        if email < MIN_REPORT_EMAIL_CHARS {
            return Err("Email is too short");
        }
        if email > MAX_REPORT_EMAIL_CHARS {
            return Err("Email is too long");
        }
        let details = self.details.trim().chars().count();
        if details == 0 {
            return Err("Details are required");
        }
        if details > MAX_REPORT_DETAILS_CHARS {
            return Err("Details are too long");
        }
        Ok(())
    }
}

pub(crate) fn report_notice(outcome: Result<(), FetchFailure>) -> String {
    match outcome {
        Ok(()) => "Report sent. Thank you!".to_string(),
        Err(FetchFailure::RateLimited) => "You're being ratelimited!".to_string(),
        Err(failure) => failure
            .server_message()
            .unwrap_or("Could not send the report, please try again later")
            .to_string(),
    }
}

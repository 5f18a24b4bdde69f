/*!
 * One-shot messages carried across redirects.
 *
 * A notice travels as a fixed code in the `notice` query parameter, so no
 * message state has to live in the session.
 */

use serde::Deserialize;

/// Message shown after a redirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Registered,
    SignedOut,
    AlreadySignedIn,
    SignInRequired,
    ReviewSaved,
    ReviewExists,
}

impl Notice {
    const ALL: [Notice; 6] = [
        Notice::Registered,
        Notice::SignedOut,
        Notice::AlreadySignedIn,
        Notice::SignInRequired,
        Notice::ReviewSaved,
        Notice::ReviewExists,
    ];

    /// Query parameter value
    pub fn code(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::SignedOut => "signed_out",
            Self::AlreadySignedIn => "already_signed_in",
            Self::SignInRequired => "sign_in_required",
            Self::ReviewSaved => "review_saved",
            Self::ReviewExists => "review_exists",
        }
    }

    /// Parse a query parameter value; unknown codes are ignored
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|notice| notice.code() == code)
    }

    /// Text shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            Self::Registered => "Registration successful, you can now log in.",
            Self::SignedOut => "You have been logged out.",
            Self::AlreadySignedIn => "You are already logged in.",
            Self::SignInRequired => "Please log in to continue.",
            Self::ReviewSaved => "Thank you, your review has been saved.",
            Self::ReviewExists => "You have already reviewed this book.",
        }
    }

    /// Whether the notice reports a refused action
    pub fn is_error(&self) -> bool {
        matches!(self, Self::AlreadySignedIn | Self::ReviewExists)
    }

    /// `path` with this notice attached
    pub fn attach_to(&self, path: &str) -> String {
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{}{}notice={}", path, separator, self.code())
    }
}

/// `?notice=` query parameters
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    #[serde(default)]
    pub notice: Option<String>,
}

impl NoticeQuery {
    pub fn notice(&self) -> Option<Notice> {
        self.notice.as_deref().and_then(Notice::from_code)
    }
}

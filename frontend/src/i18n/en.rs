pub mod common {
    pub const APP_TITLE: &str = "Moderation Console";
    pub const LOADING: &str = "Loading...";
}

pub mod theme_toggle {
    pub const SWITCH_TO_LIGHT: &str = "Switch to light mode";
    pub const SWITCH_TO_DARK: &str = "Switch to dark mode";
}

pub mod error_banner {
    pub const TITLE: &str = "Something went wrong";
    pub const CLOSE_ARIA: &str = "Dismiss error";
}

pub mod header {
    pub const LOGOUT: &str = "Log out";
    pub const SIGNED_IN_AS: &str = "Signed in as";
    pub const OFFLINE_BADGE: &str = "offline";
    pub const OFFLINE_TOOLTIP: &str = "Backend unreachable, showing the cached session";
    pub const SIMULATED_BADGE: &str = "dev session";
}

pub mod login {
    pub const HEADING: &str = "Moderator sign in";
    pub const SUBHEADING: &str = "Only accounts with moderator privileges can sign in.";
    pub const EMAIL_LABEL: &str = "Email";
    pub const EMAIL_PLACEHOLDER: &str = "admin@example.com";
    pub const PASSWORD_LABEL: &str = "Password";
    pub const REMEMBER_ME: &str = "Remember me";
    pub const SUBMIT: &str = "Sign in";
    pub const SUBMITTING: &str = "Signing in...";
}

pub mod dashboard {
    pub const STAT_PENDING: &str = "Pending reports";
    pub const STAT_TOTAL: &str = "Total reports";
    pub const STAT_BLOCKED: &str = "Blocked users";
    pub const STAT_MESSAGES: &str = "Total messages";
    pub const FILTER_ARIA: &str = "Filter reports by status";
    pub const FILTER_ALL: &str = "All";
    pub const FILTER_PENDING: &str = "Pending";
    pub const FILTER_REVIEWED: &str = "Reviewed";
    pub const FILTER_DISMISSED: &str = "Dismissed";
    pub const REFRESH: &str = "Refresh";
    pub const EMPTY: &str = "No reports found.";
    pub const REPORT_COUNT_TEMPLATE: &str = "{} report(s)";
    pub const REPORTED_BY_TEMPLATE: &str = "Reported by {}";
    pub const REASON: &str = "Reason";
}

pub mod message_view {
    pub const CLOSE_ARIA: &str = "Close message";
    pub const AUTHOR: &str = "Author";
    pub const POSTED: &str = "Posted";
    pub const REPORTS_TEMPLATE: &str = "Reports ({})";
    pub const NO_REPORTS: &str = "No reports.";
    pub const UNKNOWN_REPORTER: &str = "Unknown";
    pub const CLEAR: &str = "Clear reports";
    pub const MUTE: &str = "Mute author";
    pub const DELETE: &str = "Delete message";
    pub const WORKING: &str = "Working...";
    pub const CONFIRM_CLEAR: &str = "Mark every report about this message as reviewed?";
    pub const CONFIRM_DELETE: &str =
        "Delete this message? This cannot be undone and removes every report about it.";
    pub const CONFIRM_MUTE_TEMPLATE: &str = "Mute {}? They will be blocked for your account.";
}

pub mod not_found {
    pub const TITLE: &str = "404 - Page not found";
    pub const BODY: &str = "The page you are looking for does not exist.";
    pub const BACK: &str = "Back to the dashboard";
}

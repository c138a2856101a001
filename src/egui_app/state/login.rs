/// UI state for the sign-in prompt shown when no user id is configured.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginPromptState {
    /// Whether the prompt is open.
    pub open: bool,
    /// User id input.
    pub user_input: String,
    /// Whether to focus the user id field.
    pub focus_requested: bool,
    /// Last error message, if any.
    pub last_error: Option<String>,
    /// Signed-in user shown in the header.
    pub signed_in_as: Option<String>,
}

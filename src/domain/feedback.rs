use super::UserId;

/// A user's verdict on one agent answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub user_id: UserId,
    pub input: String,
    pub output: String,
    pub is_positive: Option<bool>,
    pub comments: Option<String>,
}

impl Feedback {
    /// Text that gets embedded into the feedback collection.
    pub fn to_document_text(&self) -> String {
        format!(
            "User ID: {}\nInput: {}\nOutput: {}\nIs Feedback Positive: {}\nComments: {}",
            self.user_id,
            self.input,
            self.output,
            render_optional(self.is_positive.map(|v| if v { "True" } else { "False" })),
            render_optional(self.comments.as_deref()),
        )
    }
}

fn render_optional(value: Option<&str>) -> &str {
    value.unwrap_or("None")
}

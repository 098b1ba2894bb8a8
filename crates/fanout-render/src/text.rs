//! Plain-text rendering for terminals

use fanout_core::{AggregationResult, NO_DATA_MESSAGE};
use std::fmt;

/// Render `result` as an indented report
#[must_use]
pub fn format_text(result: &AggregationResult) -> String {
    TextView(result).to_string()
}

/// Terminal view over a result
struct TextView<'a>(&'a AggregationResult);

impl fmt::Display for TextView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let Some(user) = &result.user else {
            let message = result.error.as_deref().unwrap_or(NO_DATA_MESSAGE);
            return writeln!(f, "Error: {message}");
        };

        writeln!(f, "User: {}", user.name)?;
        writeln!(f, "Email: {}", user.email)?;
        writeln!(f, "Username: {}", user.username)?;
        writeln!(f, "Posts:")?;

        for post in &result.posts {
            writeln!(f, "  {}", post.title)?;
            writeln!(f, "    {}", post.content)?;
            writeln!(f, "    Comments:")?;
            if let Some(reason) = &post.comments_error {
                writeln!(f, "      (unavailable: {reason})")?;
            }
            for comment in post.comments() {
                writeln!(f, "      - {}: {}", comment.username, comment.content)?;
            }
        }

        if let Some(error) = &result.error {
            writeln!(f, "Note: {error}")?;
        }
        Ok(())
    }
}

//! HTML fragment rendering

use fanout_core::{AggregationResult, Post, NO_DATA_MESSAGE};
use std::fmt;

/// Render `result` as an HTML fragment
#[must_use]
pub fn format_html(result: &AggregationResult) -> String {
    HtmlView(result).to_string()
}

/// HTML view over a result
struct HtmlView<'a>(&'a AggregationResult);

impl fmt::Display for HtmlView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let Some(user) = &result.user else {
            let message = result.error.as_deref().unwrap_or(NO_DATA_MESSAGE);
            return write!(f, r#"<p style="color: red;">Error: {}</p>"#, escape(message));
        };

        write!(f, "<h2>User: {}</h2>", escape(&user.name))?;
        write!(f, "<p>Email: {}</p>", escape(&user.email))?;
        write!(f, "<p>Username: {}</p>", escape(&user.username))?;
        f.write_str("<h3>Posts:</h3>")?;

        for post in &result.posts {
            write_post(f, post)?;
        }

        if let Some(error) = &result.error {
            write!(f, r#"<p style="color: red;">Note: {}</p>"#, escape(error))?;
        }
        Ok(())
    }
}

fn write_post(f: &mut fmt::Formatter<'_>, post: &Post) -> fmt::Result {
    write!(
        f,
        r#"<div style="margin-bottom: 15px;"><strong>{}</strong><br><em>{}</em><br><u>Comments:</u><ul>"#,
        escape(&post.title),
        escape(&post.content)
    )?;

    if post.comments_recovered() {
        f.write_str(r#"<li class="comments-unavailable">Comments unavailable</li>"#)?;
    }
    for comment in post.comments() {
        write!(
            f,
            "<li><strong>{}:</strong> {}</li>",
            escape(&comment.username),
            escape(&comment.content)
        )?;
    }

    f.write_str("</ul></div>")
}

/// Escape text for interpolation into HTML
#[must_use]
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fanout_core::{sample_comments, sample_posts, sample_user, UserId, INCOMPLETE_FETCH_MESSAGE};
    use pretty_assertions::assert_eq;

    fn commented_posts() -> Vec<Post> {
        sample_posts(UserId(1))
            .into_iter()
            .map(|mut p| {
                p.attach_comments(sample_comments(p.post_id));
                p
            })
            .collect()
    }

    #[test]
    fn renders_profile_posts_and_comments() {
        let result = AggregationResult::complete(sample_user(UserId(1)), commented_posts());
        let html = format_html(&result);

        assert!(html.starts_with("<h2>User: Kristine Garcia</h2>"));
        assert!(html.contains("<p>Email: kristinemayg@gmail.com</p>"));
        assert!(html.contains("<strong>Yet Another Post</strong>"));
        assert!(html.contains("<li><strong>commenter1:</strong> Great post!</li>"));
        assert_eq!(html.matches("<li>").count(), 9);
        assert!(!html.contains("Note:"));
    }

    #[test]
    fn missing_user_renders_error_only() {
        let result = AggregationResult::partial(None, Vec::new());
        assert_eq!(
            format_html(&result),
            format!(r#"<p style="color: red;">Error: {INCOMPLETE_FETCH_MESSAGE}</p>"#)
        );
    }

    #[test]
    fn missing_user_and_error_renders_default() {
        let html = format_html(&AggregationResult::default());
        assert!(html.contains("Error: No data available"));
    }

    #[test]
    fn partial_result_appends_note() {
        let result = AggregationResult::partial(Some(sample_user(UserId(1))), Vec::new());
        let html = format_html(&result);
        assert!(html.contains("<h3>Posts:</h3>"));
        assert!(html.ends_with(&format!(
            r#"<p style="color: red;">Note: {INCOMPLETE_FETCH_MESSAGE}</p>"#
        )));
    }

    #[test]
    fn uncommented_and_recovered_posts() {
        let mut posts = sample_posts(UserId(1));
        posts[1].recover_comments("failed to fetch comments for post 2");
        let result = AggregationResult::complete(sample_user(UserId(1)), posts);
        let html = format_html(&result);

        assert_eq!(html.matches("<ul></ul>").count(), 2);
        assert_eq!(html.matches("Comments unavailable").count(), 1);
    }

    #[test]
    fn escapes_interpolated_text() {
        assert_eq!(escape(r#"<b>"Tom" & 'Jerry'</b>"#), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");

        let mut user = sample_user(UserId(1));
        user.name = "<script>".to_string();
        let html = format_html(&AggregationResult::complete(user, Vec::new()));
        assert!(html.contains("User: &lt;script&gt;"));
    }
}

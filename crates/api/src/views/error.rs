use axum::http::StatusCode;

use super::{escape, layout};

/// Error page for a failed HTML request.
pub fn page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        r#"<h1>{code} {reason}</h1>
<p class="error">{message}</p>
<p><a href="/">Back to the start page</a></p>
"#,
        code = status.as_u16(),
        message = escape(message),
    );
    layout(reason, &body)
}

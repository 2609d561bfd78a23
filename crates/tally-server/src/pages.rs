//! Minimal server-rendered pages
//!
//! Data is loaded by `/static/app.js` through the JSON API; these pages only
//! carry the forms.

use tally_core::ExpenseCategory;

/// Escape text for inclusion in HTML
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · Tally</title>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
        body = body
    )
}

fn credentials_form(action: &str, submit: &str, error: Option<&str>) -> String {
    let error_html = error
        .map(|e| format!(r#"<p class="error" role="alert">{}</p>"#, escape(e)))
        .unwrap_or_default();
    format!(
        r#"{error_html}
<form method="post" action="{action}">
  <label>Email <input type="email" name="email" required></label>
  <label>Password <input type="password" name="password" required></label>
  <button type="submit">{submit}</button>
</form>"#
    )
}

pub fn register_page(error: Option<&str>) -> String {
    let body = format!(
        "<h1>Create an account</h1>\n{}\n<p>Already registered? <a href=\"/login\">Log in</a></p>",
        credentials_form("/register", "Register", error)
    );
    layout("Register", &body)
}

pub fn login_page(error: Option<&str>) -> String {
    let body = format!(
        "<h1>Log in</h1>\n{}\n<p>New here? <a href=\"/register\">Create an account</a></p>",
        credentials_form("/login", "Log in", error)
    );
    layout("Log in", &body)
}

pub fn home_page(email: &str) -> String {
    let options: String = ExpenseCategory::all()
        .iter()
        .map(|c| format!("<option>{}</option>", escape(c.as_str())))
        .collect();

    let body = format!(
        r#"<header>
  <h1>Tally</h1>
  <p>Signed in as {email} · <a href="/logout">Log out</a></p>
</header>
<section>
  <h2>Add expense</h2>
  <form id="expense-form">
    <input type="date" name="date" required>
    <input type="number" name="amount" step="0.01" min="0.01" required>
    <select name="category">{options}</select>
    <input type="text" name="description" placeholder="Description">
    <button type="submit">Add</button>
  </form>
  <h2>Describe an expense</h2>
  <form id="parse-form">
    <input type="text" name="text" placeholder="Paid 500 for electricity bill">
    <button type="submit">Fill in</button>
  </form>
  <p id="status" role="status"></p>
</section>
<section>
  <h2>Expenses</h2>
  <table id="expenses"><thead><tr><th>Date</th><th>Category</th><th>Amount</th><th>Description</th></tr></thead><tbody></tbody></table>
</section>
<section>
  <h2>Insights (last 30 days)</h2>
  <button id="insights-button" type="button">Get insights</button>
  <pre id="insights"></pre>
</section>
<script src="/static/app.js"></script>"#,
        email = escape(email),
        options = options
    );
    layout("Home", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_home_page_escapes_email() {
        let html = home_page("<script>@x.com");
        assert!(html.contains("&lt;script&gt;@x.com"));
        assert!(html.contains("<option>Stock purchase</option>"));
    }

    #[test]
    fn test_form_error_rendered() {
        let html = login_page(Some("Invalid email or password"));
        assert!(html.contains("Invalid email or password"));
        assert!(!register_page(None).contains("class=\"error\""));
    }
}

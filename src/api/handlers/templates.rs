//! HTML documents served by the view and login handlers.

pub const NOT_LOGGED_IN: &str = "Not logged in.";
pub const WRONG_CREDENTIALS: &str = "Wrong credentials.";

/// Escape text for safe inclusion in HTML element content.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Anonymous page with the login form. `message` is inserted verbatim.
pub fn login_form(message: &str, show_hint: bool) -> String {
    let hint = if show_hint {
        "<small>Hint: Username alice, Password bob.</small>\n"
    } else {
        ""
    };
    format!(
        r#"
<!doctype html>
<html><body>
{message}
<form method="post" action="/login">
    User: <input name="user">
    <br>
    Password: <input name="pass" type="password">
<br>
<input type="submit" value="go">
</form>
{hint}</body></html>
"#
    )
}

/// Page for an authenticated session, with the logout button.
pub fn logged_in(username: &str) -> String {
    let message = format!("Welcome! You are logged in as {}", escape(username));
    format!(
        r#"
<!doctype html>
<html lang="en">
<body>
{message}
<br>
<form method="post" action="/logout">
    <input type="submit" value="Log out"><br>
    <input type="hidden" name="logout" value="true">
</form>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_form_posts_credentials() {
        let page = login_form(NOT_LOGGED_IN, true);
        assert!(page.contains("Not logged in."));
        assert!(page.contains(r#"action="/login""#));
        assert!(page.contains(r#"name="user""#));
        assert!(page.contains(r#"name="pass" type="password""#));
        assert!(page.contains("Hint: Username alice, Password bob."));
    }

    #[test]
    fn login_form_hides_hint() {
        let page = login_form(WRONG_CREDENTIALS, false);
        assert!(page.contains("Wrong credentials."));
        assert!(!page.contains("Hint:"));
    }

    #[test]
    fn logged_in_page_offers_logout() {
        let page = logged_in("alice");
        assert!(page.contains("logged in as alice"));
        assert!(page.contains(r#"action="/logout""#));
        assert!(page.contains(r#"name="logout" value="true""#));
    }

    #[test]
    fn username_is_escaped() {
        let page = logged_in("<script>alert('x')</script>");
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"));
    }
}

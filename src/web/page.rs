//! HTML rendering for the upload page.

/// Shown in place of the file list when the store is empty.
pub const EMPTY_PLACEHOLDER: &str = "(none)";

/// Render the upload page: pending flash messages, the upload form and the
/// list of stored files.
pub fn render_index(messages: &[String], files: &[String]) -> String {
    let mut html = String::from(
        "<!doctype html>\n<title>Simple Upload Server</title>\n<h2>Upload Files</h2>\n",
    );

    if !messages.is_empty() {
        html.push_str("<ul style=\"color:red;\">\n");
        for msg in messages {
            html.push_str(&format!("  <li>{}</li>\n", html_escape(msg)));
        }
        html.push_str("</ul>\n");
    }

    html.push_str(concat!(
        "<form method=post enctype=multipart/form-data>\n",
        "  <input type=file name=file multiple>\n",
        "  <input type=submit value=Upload>\n",
        "</form>\n",
        "<hr>\n",
        "<h3>Uploaded files</h3>\n",
        "<ul>\n",
    ));

    if files.is_empty() {
        html.push_str(&format!("  <li>{EMPTY_PLACEHOLDER}</li>\n"));
    }
    for name in files {
        html.push_str(&format!("  <li>{}</li>\n", html_escape(name)));
    }
    html.push_str("</ul>\n");

    html
}

fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

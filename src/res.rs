use crate::session::Flash;

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            // keeps user text from being read as a template slot
            '{' => escaped.push_str("&#123;"),
            '}' => escaped.push_str("&#125;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn flash_html(flash: &Flash) -> String {
    let mut html = String::new();
    if flash.is_empty() {
        return html;
    }
    for (kind, message) in [("notice", &flash.notice), ("alert", &flash.alert)] {
        if let Some(message) = message {
            html += &include_res!(str, "/pages/flash.html")
                .replace("{kind}", kind)
                .replace("{message}", &escape_html(message));
        }
    }
    html
}

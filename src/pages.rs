//! Minimal server-rendered markup for the two gallery views.

use crate::gallery::GalleryState;
use std::fmt::Write as _;

const TITLE: &str = "MyDesignCreations";

/// Full HTML document for the current view state
pub fn render(state: &GalleryState) -> String {
    let body = if state.is_authorized {
        render_gallery(state)
    } else {
        render_integrate()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Your Dribbble Creations">
    <title>{TITLE}</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; }}
        main {{ max-width: 1024px; margin: 1rem auto; padding: 0 1rem; }}
        .center {{ min-height: 100vh; display: flex; align-items: center; justify-content: center; }}
        .grid {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); gap: 1rem; }}
        .shot {{ border: 1px solid #0d0c22; border-radius: 8px; overflow: hidden; color: #0d0c22; text-decoration: none; }}
        .shot img {{ display: block; width: 100%; height: 15rem; object-fit: cover; background: #e5e7eb; }}
        .shot p {{ margin: 1rem; font-weight: 600; }}
        .error {{ color: #b91c1c; }}
    </style>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

fn render_integrate() -> String {
    r#"<main class="center">
    <form method="get" action="/authorize">
        <button type="submit">Integrate Dribbble</button>
    </form>
</main>"#
        .to_string()
}

fn render_gallery(state: &GalleryState) -> String {
    let mut html = String::from("<main>\n");

    let profile_url = state
        .profile
        .as_ref()
        .map(|p| p.profile_url.as_str())
        .unwrap_or_default();
    let _ = write!(
        html,
        r#"    <header>
        <form method="post" action="/account/remove"><button type="submit">Remove account</button></form>
        <a href="{url}" target="_blank" rel="noreferrer">{url}</a>
    </header>
"#,
        url = escape_html(profile_url)
    );

    if let Some(error) = &state.error {
        let _ = writeln!(html, r#"    <p class="error">{}</p>"#, escape_html(error));
    }

    html.push_str("    <div class=\"grid\">\n");
    for shot in &state.items {
        let _ = write!(
            html,
            r#"        <a class="shot" href="{href}" target="_blank" rel="noreferrer">
            <img src="{image}" alt="{title}" loading="lazy">
            <p>{title}</p>
        </a>
"#,
            href = escape_html(&shot.html_url),
            image = escape_html(shot.images.best().unwrap_or_default()),
            title = escape_html(&shot.title),
        );
    }
    html.push_str("    </div>\n");

    if state.can_load_more() {
        let next = state.page.unwrap_or(1) + 1;
        let _ = writeln!(html, r#"    <a class="more" href="/?page={next}">Show more</a>"#);
    }

    html.push_str("</main>");
    html
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

//! Server-rendered HTML pages.

use std::fmt::Write;

use rocket::response::content::RawHtml;

use crate::model::{
    api::results::Results,
    db::{Candidate, Sponsor, User},
};

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, user: Option<&User>, body: &str) -> RawHtml<String> {
    let account = match user {
        Some(user) => format!(
            r#"<span class="who">{}</span> <a href="/logout">Log out</a>"#,
            escape(&user.name)
        ),
        None => r#"<a href="/login">Log in</a>"#.to_string(),
    };
    RawHtml(format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Campus Vote</title>
<link rel="stylesheet" href="/static/css/style.css">
</head>
<body>
<header><a href="/" class="brand">Campus Vote</a> <nav><a href="/results">Results</a> {account}</nav></header>
<main>
{body}
</main>
<script src="/static/js/main.js"></script>
</body>
</html>
"#,
        title = escape(title),
    ))
}

/// The home page: the ballot and the sponsors.
pub fn index(
    candidates: &[Candidate],
    sponsors: &[Sponsor],
    user: Option<&User>,
    voted: bool,
) -> RawHtml<String> {
    let mut body = String::from("<h1>Student Council Election</h1>\n");
    if voted {
        body.push_str(r#"<p class="notice">Your vote has been recorded. <a href="/results">See the results</a>.</p>"#);
    } else if user.is_none() {
        body.push_str(r#"<p class="notice"><a href="/login">Log in</a> to cast your vote.</p>"#);
    }

    body.push_str("\n<section class=\"candidates\">\n");
    for candidate in candidates {
        let button = if user.is_some() && !voted {
            format!(
                r#"<button class="btn-primary" data-candidate="{}">Vote</button>"#,
                candidate.id
            )
        } else {
            String::new()
        };
        let _ = writeln!(
            body,
            r#"<article class="candidate"><img src="{}" alt="{name}"><h2>{name}</h2><p>{}</p>{button}</article>"#,
            escape(&candidate.photo_url),
            escape(&candidate.major),
            name = escape(&candidate.name),
        );
    }
    body.push_str("</section>\n");

    if !sponsors.is_empty() {
        body.push_str("<section class=\"sponsors\">\n<h2>Sponsors</h2>\n");
        for sponsor in sponsors {
            let _ = writeln!(
                body,
                r#"<img src="{}" alt="{name}" title="{name}">"#,
                escape(&sponsor.logo_url),
                name = escape(&sponsor.name),
            );
        }
        body.push_str("</section>\n");
    }

    layout("Vote", user, &body)
}

/// The login form, with an inline error after a failed attempt.
pub fn login(error: Option<&str>, email: &str) -> RawHtml<String> {
    let error = error
        .map(|msg| format!(r#"<p class="error">{}</p>"#, escape(msg)))
        .unwrap_or_default();
    let body = format!(
        r#"<h1>Log in</h1>
{error}
<form method="post" action="/login">
<label>Email <input type="email" name="email" value="{}" required></label>
<label>Password <input type="password" name="password" required></label>
<button class="btn-primary" type="submit">Log in</button>
</form>
<h2>New here?</h2>
<form id="register-form">
<label>Name <input name="name" required></label>
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<button class="btn-outline" type="submit">Register</button>
</form>"#,
        escape(email),
    );
    layout("Log in", None, &body)
}

/// Vote counts for every candidate, and the current leader.
pub fn results(results: &Results, user: Option<&User>) -> RawHtml<String> {
    let mut body = String::from("<h1>Results</h1>\n");
    match &results.winner {
        Some(winner) if results.total_votes > 0 => {
            let _ = writeln!(
                body,
                r#"<p class="winner">Leading: <strong>{}</strong> with {} of {} votes</p>"#,
                escape(&winner.name),
                winner.votes,
                results.total_votes,
            );
        }
        _ => body.push_str("<p class=\"winner\">No votes have been cast yet.</p>\n"),
    }

    body.push_str("<table class=\"tally\">\n<tr><th>Candidate</th><th>Major</th><th>Votes</th></tr>\n");
    for candidate in &results.candidates {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&candidate.name),
            escape(&candidate.major),
            candidate.votes,
        );
    }
    body.push_str("</table>\n");

    layout("Results", user, &body)
}

pub fn thank_you(user: &User) -> RawHtml<String> {
    let body = format!(
        r#"<h1>Thank you, {}!</h1>
<p>Your vote has been recorded.</p>
<p><a href="/results">See the results</a></p>"#,
        escape(&user.name)
    );
    layout("Thank you", Some(user), &body)
}

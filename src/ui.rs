use ratatui::{prelude::*, widgets::*};

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

/// Status code color
pub fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::Red,
        500..=599 => Color::Magenta,
        _ => Color::Yellow,
    }
}

/// Method color
pub fn method_color(method: &str) -> Color {
    match method {
        "GET" => Color::Green,
        "POST" => Color::Yellow,
        "PUT" => Color::Blue,
        "PATCH" => Color::Cyan,
        "DELETE" => Color::Red,
        _ => Color::White,
    }
}

/// Reason phrase for the status strip
pub fn status_reason(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "",
    }
}

/// Simple JSON syntax highlighting
pub fn highlight_json(text: &str) -> Vec<Line<'static>> {
    text.lines().map(highlight_line).collect()
}

fn highlight_line(line: &str) -> Line<'static> {
    let chars: Vec<char> = line.chars().collect();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut raw = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '"' => {
                flush_raw(&mut spans, &mut raw);
                let start = i;
                i += 1;
                while i < chars.len() {
                    match chars[i] {
                        '\\' => i += 2,
                        '"' => {
                            i += 1;
                            break;
                        }
                        _ => i += 1,
                    }
                }
                let end = i.min(chars.len());
                let literal: String = chars[start..end].iter().collect();
                let is_key = chars[end..]
                    .iter()
                    .find(|c| !c.is_whitespace())
                    .is_some_and(|c| *c == ':');
                let color = if is_key { Color::Cyan } else { Color::Green };
                spans.push(Span::styled(literal, Style::default().fg(color)));
            }
            '{' | '}' | '[' | ']' => {
                flush_raw(&mut spans, &mut raw);
                spans.push(Span::styled(
                    chars[i].to_string(),
                    Style::default().fg(Color::Yellow),
                ));
                i += 1;
            }
            c if c.is_ascii_digit() || c == '-' => {
                flush_raw(&mut spans, &mut raw);
                let start = i;
                i += 1;
                while i < chars.len()
                    && (chars[i].is_ascii_digit() || matches!(chars[i], '.' | 'e' | 'E' | '+' | '-'))
                {
                    i += 1;
                }
                spans.push(Span::styled(
                    chars[start..i].iter().collect::<String>(),
                    Style::default().fg(Color::Yellow),
                ));
            }
            't' | 'f' | 'n' => {
                let matched = ["true", "false", "null"]
                    .iter()
                    .find(|word| chars[i..].starts_with(&word.chars().collect::<Vec<_>>()));
                match matched {
                    Some(word) => {
                        flush_raw(&mut spans, &mut raw);
                        spans.push(Span::styled(
                            (*word).to_string(),
                            Style::default().fg(Color::Magenta),
                        ));
                        i += word.len();
                    }
                    None => {
                        raw.push(chars[i]);
                        i += 1;
                    }
                }
            }
            c => {
                raw.push(c);
                i += 1;
            }
        }
    }

    flush_raw(&mut spans, &mut raw);
    Line::from(spans)
}

fn flush_raw(spans: &mut Vec<Span<'static>>, raw: &mut String) {
    if !raw.is_empty() {
        spans.push(Span::raw(std::mem::take(raw)));
    }
}

//! Server-rendered HTML pages.
//!
//! All interpolated text goes through [`escape`]; nothing user or vendor
//! supplied is written into markup raw.

use std::fmt::Write;

use axum::http::StatusCode;
use vsum_models::{seconds_to_hhmmss, HistoryEntry, SummaryRecord, VideoId};

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem;line-height:1.5}\
nav a{margin-right:1rem}.flash{background:#fdecea;border:1px solid #f5c2c0;padding:.75rem;border-radius:4px}\
table{border-collapse:collapse;width:100%}td,th{border:1px solid #ddd;padding:.4rem;text-align:left}\
.tag{display:inline-block;background:#eef;padding:.1rem .5rem;margin:.1rem;border-radius:3px}";

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{style}</style>\n</head>\n<body>\n\
         <nav><a href=\"/\">Upload</a><a href=\"/history\">History</a></nav>\n\
         {body}\n</body>\n</html>\n",
        title = escape(title),
        style = STYLE,
    )
}

fn summary_href(video_id: &VideoId) -> String {
    format!("/summary/{}", urlencoding::encode(video_id.as_str()))
}

// =============================================================================
// Pages
// =============================================================================

/// Upload form, with an optional flash message from a failed upload.
pub fn index_page(flash: Option<&str>) -> String {
    let mut body = String::from("<h1>Video Summarizer</h1>\n");
    if let Some(message) = flash.filter(|m| !m.is_empty()) {
        let _ = writeln!(body, "<p class=\"flash\" role=\"alert\">{}</p>", escape(message));
    }
    body.push_str(
        "<form action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">\n\
         <input type=\"file\" name=\"video\" accept=\"video/*\" required>\n\
         <button type=\"submit\">Upload and summarize</button>\n\
         </form>\n\
         <p>Indexing can take several minutes. Keep this page open until the summary appears.</p>",
    );
    layout("Video Summarizer", &body)
}

/// Full summary of one stored record.
pub fn summary_page(record: &SummaryRecord) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", escape(&record.title));
    let _ = writeln!(
        body,
        "<p>Video: <strong>{}</strong> <small>({})</small></p>",
        escape(&record.video_name),
        escape(record.video_id.as_str())
    );

    body.push_str("<h2>Topics</h2>\n<p>");
    push_tags(&mut body, &record.topics);
    body.push_str("</p>\n<h2>Hashtags</h2>\n<p>");
    push_tags(&mut body, &record.hashtags);
    body.push_str("</p>\n");

    let _ = writeln!(body, "<h2>Summary</h2>\n<p>{}</p>", escape(&record.summary));

    body.push_str("<h2>Chapters</h2>\n");
    if record.chapters.is_empty() {
        body.push_str("<p>No chapters.</p>\n");
    } else {
        body.push_str("<table>\n<tr><th>#</th><th>Time</th><th>Title</th><th>Summary</th></tr>\n");
        for chapter in &record.chapters {
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td>{} - {}</td><td>{}</td><td>{}</td></tr>",
                chapter.chapter_number,
                seconds_to_hhmmss(chapter.start),
                seconds_to_hhmmss(chapter.end),
                escape(&chapter.chapter_title),
                escape(&chapter.chapter_summary)
            );
        }
        body.push_str("</table>\n");
    }

    body.push_str("<h2>Highlights</h2>\n");
    if record.highlights.is_empty() {
        body.push_str("<p>No highlights.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for highlight in &record.highlights {
            let _ = write!(
                body,
                "<li><strong>{} - {}</strong> {}",
                seconds_to_hhmmss(highlight.start),
                seconds_to_hhmmss(highlight.end),
                escape(&highlight.highlight)
            );
            if let Some(summary) = &highlight.highlight_summary {
                let _ = write!(body, "<br><small>{}</small>", escape(summary));
            }
            body.push_str("</li>\n");
        }
        body.push_str("</ul>\n");
    }

    let _ = writeln!(
        body,
        "<h2>Keywords</h2>\n<pre>{}</pre>",
        escape(&record.keywords)
    );

    layout(page_title(record), &body)
}

/// Page for a summary id with no stored record.
pub fn not_found_page(video_id: &str) -> String {
    let body = format!(
        "<h1>Summary not found</h1>\n<p>No summary exists for video <code>{}</code>.</p>\n\
         <p><a href=\"/history\">Browse history</a></p>",
        escape(video_id)
    );
    layout("Summary not found", &body)
}

/// Listing of every stored summary with a lookup form.
pub fn history_page(entries: &[HistoryEntry]) -> String {
    let mut body = String::from("<h1>History</h1>\n");
    body.push_str(LOOKUP_FORM);

    if entries.is_empty() {
        body.push_str("<p>No videos have been summarized yet.</p>\n");
    } else {
        body.push_str("<table>\n<tr><th>Video</th><th>Video id</th></tr>\n");
        for entry in entries {
            let _ = writeln!(
                body,
                "<tr><td><a href=\"{}\">{}</a></td><td><code>{}</code></td></tr>",
                escape(&summary_href(&entry.video_id)),
                escape(&entry.video_name),
                escape(entry.video_id.as_str())
            );
        }
        body.push_str("</table>\n");
    }
    layout("History", &body)
}

/// Result of looking up a video id from the history form.
pub fn history_results_page(video_id: &str, records: &[SummaryRecord]) -> String {
    let mut body = String::from("<h1>History</h1>\n");
    body.push_str(LOOKUP_FORM);

    if records.is_empty() {
        let _ = writeln!(
            body,
            "<p>No summaries found for <code>{}</code>.</p>",
            escape(video_id)
        );
    } else {
        body.push_str("<table>\n<tr><th>Video</th><th>Title</th><th>Created</th></tr>\n");
        for record in records {
            let _ = writeln!(
                body,
                "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td></tr>",
                escape(&summary_href(&record.video_id)),
                escape(&record.video_name),
                escape(&record.title),
                record.created_at.format("%Y-%m-%d %H:%M UTC")
            );
        }
        body.push_str("</table>\n");
    }
    layout("History", &body)
}

/// Generic error page.
pub fn error_page(status: StatusCode, detail: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<h1>{} {}</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to upload</a></p>",
        status.as_u16(),
        escape(title),
        escape(detail)
    );
    layout(title, &body)
}

const LOOKUP_FORM: &str = "<form action=\"/history\" method=\"post\">\n\
    <input type=\"text\" name=\"video_id\" placeholder=\"Video id\" required>\n\
    <button type=\"submit\">Look up</button>\n</form>\n";

fn push_tags(body: &mut String, tags: &[String]) {
    if tags.is_empty() {
        body.push_str("<em>none</em>");
        return;
    }
    for tag in tags {
        let _ = write!(body, "<span class=\"tag\">{}</span>", escape(tag));
    }
}

fn page_title(record: &SummaryRecord) -> &str {
    if record.title.trim().is_empty() {
        &record.video_name
    } else {
        &record.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vsum_models::{Chapter, Highlight};

    fn record() -> SummaryRecord {
        SummaryRecord {
            id: 1,
            video_id: VideoId::from("vid_123"),
            index_name: "song-a1b2c3d4".to_string(),
            video_name: "song.mp4".to_string(),
            title: "Live <at> the Hall".to_string(),
            topics: vec!["music".to_string()],
            hashtags: vec!["#live".to_string()],
            summary: "A band plays.".to_string(),
            chapters: vec![Chapter::new(0, 0.0, 3725.0, "Intro", "Walk on")],
            highlights: vec![Highlight::new(61.0, 65.5, "Solo").with_summary("Long solo")],
            keywords: "concert".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<script>alert('x') & \"y\"</script>"),
            "&lt;script&gt;alert(&#39;x&#39;) &amp; &quot;y&quot;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_summary_page_renders_fields_and_times() {
        let html = summary_page(&record());
        assert!(html.contains("Live &lt;at&gt; the Hall"));
        assert!(!html.contains("<at>"));
        assert!(html.contains("song.mp4"));
        assert!(html.contains("00:00:00 - 01:02:05"));
        assert!(html.contains("00:01:01 - 00:01:05"));
        assert!(html.contains("Long solo"));
        assert!(html.contains("#live"));
        assert!(html.contains("concert"));
    }

    #[test]
    fn test_index_page_flash() {
        assert!(index_page(Some("Invalid file type")).contains("Invalid file type"));
        assert!(!index_page(None).contains("class=\"flash\""));
        assert!(!index_page(Some("")).contains("class=\"flash\""));
    }

    #[test]
    fn test_history_links_are_encoded() {
        let entries = vec![HistoryEntry {
            video_id: VideoId::from("a b"),
            video_name: "clip.mp4".to_string(),
        }];
        let html = history_page(&entries);
        assert!(html.contains("href=\"/summary/a%20b\""));
    }

    #[test]
    fn test_history_results_empty_message() {
        let html = history_results_page("missing", &[]);
        assert!(html.contains("No summaries found"));
    }
}

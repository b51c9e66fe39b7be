// src/digest.rs
//! Digest rendering: one Markdown message, grouped by category, capped to
//! the Telegram payload limit.

use crate::classify::Category;
use crate::ingest::types::NewsItem;

/// Telegram sendMessage hard limit, in characters.
pub const TRANSPORT_MAX_CHARS: usize = 4096;
/// We truncate below the transport limit to leave headroom for the marker.
const SAFE_LIMIT_CHARS: usize = 4000;
const ELLIPSIS: &str = "...";

const MAX_TITLE_CHARS: usize = 100;
const MAX_EXCERPT_CHARS: usize = 200;

/// Render the selected items into a single message.
///
/// The result is always at most [`TRANSPORT_MAX_CHARS`] characters.
pub fn render(items: &[NewsItem], timestamp: &str) -> String {
    if items.is_empty() {
        return "📭 No fresh items this run".to_string();
    }

    let mut msg = String::from("🔔 News digest\n\n");
    let mut counter = 1usize;

    for category in Category::ORDERED {
        let group: Vec<&NewsItem> = items.iter().filter(|i| i.category == category).collect();
        if group.is_empty() {
            continue;
        }
        msg.push_str(&format!("*{}*\n", category.label()));
        for item in group {
            msg.push_str(&render_item(item, counter));
            counter += 1;
        }
        msg.push('\n');
    }

    msg.push_str(&format!("📅 Updated: {timestamp} (UTC)"));
    clamp_chars(msg)
}

fn render_item(item: &NewsItem, n: usize) -> String {
    let title = truncate_chars(&escape_markdown(&item.title), MAX_TITLE_CHARS);
    let mut block = if item.url.is_empty() {
        format!("{n}. {title}\n")
    } else {
        format!("{n}. [{title}]({})\n", sanitize_url(&item.url))
    };

    let mut meta = format!("   via {}", escape_markdown(&item.source_name));
    if item.freshness_score == 3 {
        meta.push_str(" · 🕐 fresh");
    }
    if item.engagement.upvotes > 0 {
        meta.push_str(&format!(" · 👍 {}", item.engagement.upvotes));
    }
    if item.engagement.comments > 0 {
        meta.push_str(&format!(" · 💬 {}", item.engagement.comments));
    }
    block.push_str(&meta);
    block.push('\n');

    if !item.body.is_empty() {
        block.push_str(&format!(
            "   {}\n",
            truncate_chars(&item.body, MAX_EXCERPT_CHARS)
        ));
    }
    block
}

/// Escape the Markdown metacharacters Telegram trips over in titles.
fn escape_markdown(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '*' | '_' | '[' | ']' | '`') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Parentheses terminate a Markdown link target; percent-encode them.
fn sanitize_url(url: &str) -> String {
    url.replace('(', "%28").replace(')', "%29")
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(ELLIPSIS.len())).collect();
    format!("{cut}{ELLIPSIS}")
}

fn clamp_chars(msg: String) -> String {
    if msg.chars().count() <= SAFE_LIMIT_CHARS {
        return msg;
    }
    let cut: String = msg
        .chars()
        .take(SAFE_LIMIT_CHARS - ELLIPSIS.len())
        .collect();
    format!("{cut}{ELLIPSIS}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markdown_metacharacters() {
        assert_eq!(escape_markdown("a*b_c[d]e`f"), "a\\*b\\_c\\[d\\]e\\`f");
    }

    #[test]
    fn truncate_is_char_based() {
        // Multi-byte characters must not split.
        let s = "日本語のテキストです".repeat(20);
        let out = truncate_chars(&s, 50);
        assert_eq!(out.chars().count(), 50);
        assert!(out.ends_with(ELLIPSIS));
    }

    #[test]
    fn empty_batch_renders_notice() {
        assert_eq!(render(&[], "2025-08-29 09:00"), "📭 No fresh items this run");
    }
}

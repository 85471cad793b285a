//! Social post templates.
//!
//! All lengths are counted in Unicode scalar values (`char`s), which is how the
//! target platform measures its 280-character limit. Byte lengths would split
//! multi-byte characters and over-count CJK text.

use crate::domain::entities::daily_ranking::RankedSecurity;
use crate::domain::error::DomainError;
use chrono::{Datelike, NaiveDate};

pub const MAX_POST_CHARS: usize = 280;
const ELLIPSIS: &str = "...";

/// Glyphs for leaderboard positions 1 through 5.
pub const RANK_GLYPHS: [&str; 5] = ["🥇", "🥈", "🥉", "4️⃣", "5️⃣"];

pub fn rank_glyph(rank: u32) -> Option<&'static str> {
    let idx = usize::try_from(rank).ok()?.checked_sub(1)?;
    RANK_GLYPHS.get(idx).copied()
}

fn headline(glyph: &str, row: &RankedSecurity) -> String {
    format!(
        "{} {} (+{:.1}%)",
        glyph,
        row.security.display_name(),
        row.ranking.change_rate
    )
}

/// Leaderboard post: a dated header plus one line per row, in the given order.
/// Rows past the fifth are dropped.
pub fn build_ranking_post(date: NaiveDate, rows: &[RankedSecurity]) -> String {
    let mut lines = vec![format!("🚀 {}/{} US Top Gainers", date.month(), date.day())];
    lines.extend(
        rows.iter()
            .zip(RANK_GLYPHS)
            .map(|(row, glyph)| headline(glyph, row)),
    );
    lines.join("\n")
}

/// Single-security post: headline followed by the AI analysis, cut so the
/// whole post fits in [`MAX_POST_CHARS`].
pub fn build_analysis_post(row: &RankedSecurity) -> Result<String, DomainError> {
    let rank = row.ranking.rank;
    let glyph = rank_glyph(rank)
        .ok_or_else(|| DomainError::InvalidInput(format!("rank {rank} has no post glyph (1-5)")))?;

    let header = format!("{}\n", headline(glyph, row));
    let budget = MAX_POST_CHARS.saturating_sub(header.chars().count());
    let body = truncate_chars(&row.ranking.ai_analysis, budget);

    Ok(header + &body)
}

/// Fit `text` into `max_chars` code points. Text that already fits is
/// returned unchanged; longer text is cut to `max_chars - 3` and gets `...`,
/// so the result is exactly `max_chars` long.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars < ELLIPSIS.len() {
        return text.chars().take(max_chars).collect();
    }
    let mut out: String = text.chars().take(max_chars - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Best-record persistence: a tiny key-value store that outlives sessions.
///
/// The record lives in a dotfile in the user's home directory. Absent or
/// unreadable values read as zero; writes are best-effort.

use std::path::PathBuf;

pub const KEY_BEST_SCORE: &str = "bestScore";
pub const KEY_BEST_LEVEL: &str = "bestLevel";

/// The best-ever (score, level) pair across sessions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BestRecord {
    pub score: u32,
    pub level: u32,
}

impl BestRecord {
    /// True if a session ending with these totals beats the record on
    /// either metric. Ties don't count.
    pub fn beaten_by(&self, tokens: u32, level: u32) -> bool {
        tokens > self.score || level > self.level
    }

    /// Raise each metric to the session total where it improved.
    pub fn absorb(&mut self, tokens: u32, level: u32) {
        self.score = self.score.max(tokens);
        self.level = self.level.max(level);
    }
}

// ── Encoding ──────────────────────────────────────────────────────────────────

/// Parse `key=value` lines. Unknown keys and malformed numbers are ignored;
/// missing keys read as 0.
pub fn parse_record(text: &str) -> BestRecord {
    let mut best = BestRecord::default();
    for line in text.lines() {
        if let Some((key, value)) = line.split_once('=') {
            if let Ok(n) = value.trim().parse::<u32>() {
                match key.trim() {
                    KEY_BEST_SCORE => best.score = n,
                    KEY_BEST_LEVEL => best.level = n,
                    _ => {}
                }
            }
        }
    }
    best
}

pub fn format_record(best: BestRecord) -> String {
    format!(
        "{}={}\n{}={}\n",
        KEY_BEST_SCORE, best.score, KEY_BEST_LEVEL, best.level
    )
}

// ── File store ────────────────────────────────────────────────────────────────

fn record_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".astro_assault_record")
}

pub fn load_best() -> BestRecord {
    std::fs::read_to_string(record_path())
        .map(|s| parse_record(&s))
        .unwrap_or_default()
}

pub fn save_best(best: BestRecord) {
    let _ = std::fs::write(record_path(), format_record(best));
}

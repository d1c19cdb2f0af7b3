//! Shared UI icons and emojis.
//!
//! Emoji constants used across the CLI output for consistent visual styling,
//! with plain-text fallbacks for terminals without emoji support.

use console::Emoji;

// Review status indicators
pub static PENDING: Emoji<'_, '_> = Emoji("⏳ ", "[..]");
pub static IN_PROGRESS: Emoji<'_, '_> = Emoji("⚙️  ", "[~~]");
pub static COMPLETED: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static FAILED: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");

// General indicators
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "*");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "[STATS]");
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "[SAVE]");
pub static LOCK: Emoji<'_, '_> = Emoji("🔒 ", "[AUTH]");
pub static HEART: Emoji<'_, '_> = Emoji("💚 ", "[UP]");

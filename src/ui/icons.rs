//! Shared UI icons and emojis.
//!
//! Each icon carries a plain-text fallback for terminals without emoji
//! support.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!]");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[i]");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "*");

// Recipe indicators
pub static RECIPE: Emoji<'_, '_> = Emoji("📖 ", "");
pub static INGREDIENT: Emoji<'_, '_> = Emoji("🧂 ", "-");
pub static STEP: Emoji<'_, '_> = Emoji("🍳 ", "#");
pub static IMAGE: Emoji<'_, '_> = Emoji("🖼️  ", "[img]");
pub static DRAFT: Emoji<'_, '_> = Emoji("📝 ", "~");

// People
pub static FAMILY: Emoji<'_, '_> = Emoji("👪 ", "");
pub static PERSON: Emoji<'_, '_> = Emoji("👤 ", "-");

// Files
pub static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
pub static FILE_NEW: Emoji<'_, '_> = Emoji("📄 ", "+");

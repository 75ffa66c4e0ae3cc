//! Settings command implementations

use anyhow::Result;
use chrono::Utc;
use guard_core::models::{SettingsUpdate, UserSettings};
use guard_core::SettingsService;

use super::{print_json, Session};

fn print_settings(settings: &UserSettings) {
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    println!();
    println!("⚙️  Settings");
    println!("   Mode:     {}", field(&settings.mode));
    println!("   Theme:    {}", field(&settings.theme));
    println!("   Language: {}", field(&settings.language));
    println!("   Currency: {}", field(&settings.currency));
    if let Some(updated_at) = settings.updated_at {
        println!("   Updated:  {}", updated_at.format("%Y-%m-%d %H:%M"));
    }
}

pub async fn cmd_settings_show(session: &Session, json: bool) -> Result<()> {
    let settings = SettingsService::new(session.db.clone())
        .get(&session.user_id)
        .await?;

    if json {
        return print_json(&settings);
    }

    print_settings(&settings);
    Ok(())
}

pub async fn cmd_settings_set(session: &Session, update: &SettingsUpdate) -> Result<()> {
    if update.is_empty() {
        println!("Nothing to change. Pass --mode, --theme, --language or --currency.");
        return Ok(());
    }

    let settings = SettingsService::new(session.db.clone())
        .update(&session.user_id, update, Utc::now())
        .await?;

    println!("✅ Settings updated");
    print_settings(&settings);
    Ok(())
}

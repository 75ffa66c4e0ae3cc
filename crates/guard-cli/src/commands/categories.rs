//! Category command implementations

use anyhow::{Context, Result};
use guard_core::models::{NewCategory, TransactionType};
use guard_core::CategoryService;

use super::{print_json, truncate, Session};

pub async fn cmd_categories_list(session: &Session, json: bool) -> Result<()> {
    let categories = CategoryService::new(session.db.clone())
        .list(&session.user_id)
        .await?;

    if json {
        return print_json(&categories);
    }

    if categories.is_empty() {
        println!("No categories found. Create one with:");
        println!("  guard categories add --name Groceries --type expense");
        return Ok(());
    }

    println!();
    println!("🏷️  Categories");
    println!("   ─────────────────────────────────────────────────────────────");

    for category in &categories {
        let scope = if category.is_global() { "global" } else { "yours" };
        println!(
            "   {:20} │ {:7} │ {:6} │ {:8} │ {}",
            truncate(&category.name, 20),
            category.kind.map(|k| k.as_str()).unwrap_or("-"),
            scope,
            category.color.as_deref().unwrap_or("-"),
            category.id
        );
    }

    Ok(())
}

pub async fn cmd_categories_add(
    session: &Session,
    name: &str,
    kind: &str,
    icon: Option<&str>,
    color: Option<&str>,
) -> Result<()> {
    let category = NewCategory {
        name: name.to_string(),
        kind: kind.parse::<TransactionType>().map_err(anyhow::Error::msg)?,
        icon: icon.map(str::to_string),
        color: color.map(str::to_string),
    };

    let created = CategoryService::new(session.db.clone())
        .create(&session.user_id, &category)
        .await
        .context("Failed to create category")?;

    println!("✅ Category created: {} (ID: {})", created.name, created.id);
    Ok(())
}

pub async fn cmd_categories_delete(session: &Session, id: &str) -> Result<()> {
    CategoryService::new(session.db.clone())
        .delete(&session.user_id, id)
        .await?;
    println!("🗑️  Category {} deleted", id);
    Ok(())
}

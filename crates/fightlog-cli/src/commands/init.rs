//! Database initialization command.

use anyhow::Result;
use colored::Colorize;
use fightlog_core::catalog::load_tag_catalog;
use std::path::Path;

pub fn execute(db: &Path) -> Result<()> {
    let existed = db.exists();
    let pool = fightlog_db::init_pool(db)?;
    let catalog = load_tag_catalog(&pool)?;

    let verb = if existed { "Upgraded" } else { "Created" };
    println!(
        "{} {} database: {}",
        "✓".green().bold(),
        verb,
        db.display().to_string().cyan()
    );
    println!();
    println!("{}", "Tag types".bold());
    for tag_type in catalog.types() {
        let parent = tag_type
            .parent_id
            .and_then(|id| catalog.types().iter().find(|t| t.id == id))
            .map(|p| format!(" (under {})", p.name))
            .unwrap_or_default();
        let freeform = if tag_type.is_freeform { " freeform" } else { "" };
        println!(
            "  {} {}{}{}",
            "●".cyan(),
            tag_type.name,
            parent.dimmed(),
            freeform.dimmed()
        );
    }
    println!();
    println!("{}", "Next steps:".bold());
    println!("  fightlog fighter add <name>      # Register fighters");
    println!("  fightlog fight create --help     # Record a fight");

    Ok(())
}

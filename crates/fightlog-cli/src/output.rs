//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use fightlog_core::fight::model::{Fight, FightSummary};
use fightlog_core::fighter::Fighter;
use fightlog_core::roster::model::{Participation, Role, Side};
use fightlog_core::tags::model::Tag;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

/// Print any serializable value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a single fight with its tags and roster.
pub fn print_fight(fight: &Fight) {
    let format = fight
        .root_tag()
        .map(|t| t.value.as_str())
        .unwrap_or("unclassified");
    println!(
        "{} {} {}",
        fight.location.cyan().bold(),
        fight.date.to_string().bold(),
        format!("({})", fight.id).dimmed()
    );
    println!();

    println!("{}: {}", "Format".bold(), format.yellow());
    if !fight.is_active {
        println!("{}: {}", "Status".bold(), "deactivated".red());
    }
    if let Some(side) = fight.winner_side {
        println!("{}: side {}", "Winner".bold(), side.to_string().green());
    }
    if let Some(url) = &fight.video_url {
        println!("{}: {}", "Video".bold(), url);
    }
    if let Some(notes) = &fight.notes {
        println!("{}: {}", "Notes".bold(), notes);
    }

    println!();
    println!("{}", "Tags".bold());
    if fight.tags.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for tag in fight.tags.iter().filter(|t| t.parent_tag_id.is_none()) {
        print_tag_line(tag, 1);
        for child in fight
            .tags
            .iter()
            .filter(|t| t.parent_tag_id.as_deref() == Some(tag.id.as_str()))
        {
            print_tag_line(child, 2);
        }
    }

    println!();
    println!("{}", "Roster".bold());
    for side in Side::BOTH {
        let entries: Vec<&Participation> =
            fight.participants.iter().filter(|p| p.side == side).collect();
        let marker = if fight.winner_side == Some(side) { " ★" } else { "" };
        println!("  {}{}", format!("Side {}", side).cyan(), marker.yellow());
        for p in entries {
            println!(
                "    {} {} {}",
                role_marker(p.role),
                p.fighter_name,
                short_id(&p.fighter_id).dimmed()
            );
        }
    }
}

fn print_tag_line(tag: &Tag, depth: usize) {
    let indent = "  ".repeat(depth);
    let line = format!("{}: {}", tag.tag_type, tag.value);
    if tag.is_active {
        println!("{}{} {} {}", indent, "●".green(), line, short_id(&tag.id).dimmed());
    } else {
        println!(
            "{}{} {} {}",
            indent,
            "○".dimmed(),
            line.dimmed().strikethrough(),
            short_id(&tag.id).dimmed()
        );
    }
}

fn role_marker(role: Role) -> ColoredString {
    match role {
        Role::Captain => "C".yellow().bold(),
        Role::Combatant => "·".normal(),
        Role::Alternate => "a".dimmed(),
        Role::Support => "s".dimmed(),
    }
}

/// Print fights as a table.
pub fn print_fights_table(fights: &[FightSummary]) {
    if fights.is_empty() {
        println!("{}", "No fights found. Record one with 'fightlog fight create'.".dimmed());
        return;
    }

    let location_width = location_column_width();
    println!(
        "{:<10} {:<10} {} {:<8} {:>8} {:<6}",
        "ID",
        "Date",
        pad_right("Location", location_width),
        "Format",
        "Fighters",
        "Winner"
    );
    println!("{}", "─".repeat(location_width + 48));

    for fight in fights {
        let format = match fight.root_value.as_deref() {
            Some(v) => v.yellow(),
            None => "-".dimmed(),
        };
        let winner = fight
            .winner_side
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<10} {:<10} {} {:<8} {:>8} {:<6}",
            short_id(&fight.id),
            fight.date.to_string(),
            pad_right(&truncate_visual(&fight.location, location_width), location_width),
            format,
            fight.participant_count,
            winner
        );
    }

    println!();
    println!("{} fight(s) total", fights.len());
}

/// Print tags as a table.
pub fn print_tags_table(tags: &[Tag]) {
    if tags.is_empty() {
        println!("{}", "No tags found.".dimmed());
        return;
    }

    println!(
        "{:<36} {:<14} {:<24} {:<10} {:<8}",
        "ID", "Type", "Value", "Parent", "Status"
    );
    println!("{}", "─".repeat(96));

    for tag in tags {
        let status = if tag.is_active {
            "active".green()
        } else {
            "inactive".dimmed()
        };
        let parent = tag.parent_tag_id.as_deref().map(short_id).unwrap_or("-");
        println!(
            "{:<36} {:<14} {} {:<10} {:<8}",
            tag.id,
            tag.tag_type,
            pad_right(&truncate_visual(&tag.value, 24), 24),
            parent,
            status
        );
    }
}

/// Print fighters as a table.
pub fn print_fighters_table(fighters: &[Fighter]) {
    if fighters.is_empty() {
        println!("{}", "No fighters registered.".dimmed());
        return;
    }

    println!("{:<36} {:<30} {:<8}", "ID", "Name", "Status");
    println!("{}", "─".repeat(76));

    for f in fighters {
        let status = if f.is_active {
            "active".green()
        } else {
            "retired".dimmed()
        };
        println!(
            "{:<36} {} {:<8}",
            f.id,
            pad_right(&truncate_visual(&f.name, 30), 30),
            status
        );
    }

    println!();
    println!("{} fighter(s) total", fighters.len());
}

/// Location column width for the current terminal, defaulting to 80 columns.
fn location_column_width() -> usize {
    let width = terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80);
    width.saturating_sub(50).clamp(12, 40)
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_visual_counts_wide_chars() {
        assert_eq!(truncate_visual("Smederevo", 20), "Smederevo");
        assert_eq!(truncate_visual("Smederevo Fortress", 10), "Smederev..");
        let wide = truncate_visual("東京東京東京", 7);
        assert!(UnicodeWidthStr::width(wide.as_str()) <= 7);
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}

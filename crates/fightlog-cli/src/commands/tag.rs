//! Fight tag commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use fightlog_core::FightService;

use crate::output;

#[derive(Subcommand)]
pub enum TagCommands {
    /// Attach a tag to a fight
    Add(AddTagArgs),

    /// Change a tag's value
    Update(UpdateTagArgs),

    /// Deactivate a tag and everything below it
    Deactivate(TagRefArgs),

    /// Permanently delete a tag with no active children
    Delete(TagRefArgs),

    /// List a fight's tags
    List(ListTagsArgs),
}

#[derive(Args)]
pub struct AddTagArgs {
    /// Fight ID
    pub fight_id: String,

    /// Tag type (category, gender, custom)
    pub tag_type: String,

    /// Tag value
    pub value: String,
}

#[derive(Args)]
pub struct UpdateTagArgs {
    /// Fight ID
    pub fight_id: String,

    /// Tag ID
    pub tag_id: String,

    /// New value
    pub value: String,
}

#[derive(Args)]
pub struct TagRefArgs {
    /// Fight ID
    pub fight_id: String,

    /// Tag ID
    pub tag_id: String,
}

#[derive(Args)]
pub struct ListTagsArgs {
    /// Fight ID
    pub fight_id: String,

    /// Include deactivated tags
    #[arg(short, long)]
    pub all: bool,
}

pub fn execute(cmd: TagCommands, service: &FightService, json: bool) -> Result<()> {
    match cmd {
        TagCommands::Add(args) => {
            let tag = service.add_tag(&args.fight_id, &args.tag_type, &args.value)?;
            if json {
                return output::print_json(&tag);
            }
            println!(
                "{} Added {} tag: {} ({})",
                "✓".green().bold(),
                tag.tag_type,
                tag.value.cyan(),
                tag.id.dimmed()
            );
        }

        TagCommands::Update(args) => {
            let tag = service.update_tag(&args.fight_id, &args.tag_id, &args.value)?;
            if json {
                return output::print_json(&tag);
            }
            println!(
                "{} Updated {} tag to {}",
                "✓".green().bold(),
                tag.tag_type,
                tag.value.cyan()
            );
        }

        TagCommands::Deactivate(args) => {
            let changed = service.deactivate_tag(&args.fight_id, &args.tag_id)?;
            if json {
                return output::print_json(&changed);
            }
            if changed.is_empty() {
                println!("{}", "Tag was already deactivated; nothing changed.".dimmed());
            } else {
                println!("{} Deactivated {} tag(s)", "✓".green().bold(), changed.len());
                output::print_tags_table(&changed);
            }
        }

        TagCommands::Delete(args) => {
            service.delete_tag(&args.fight_id, &args.tag_id)?;
            println!("{} Deleted tag {}", "✓".green().bold(), args.tag_id.dimmed());
        }

        TagCommands::List(args) => {
            let tags = service.list_tags(&args.fight_id, args.all)?;
            if json {
                return output::print_json(&tags);
            }
            output::print_tags_table(&tags);
        }
    }

    Ok(())
}

use super::{prize_table, App};
use clap::Subcommand;
use dialoguer::Editor;
use std::path::PathBuf;
use wheel_core::WheelError;
use wheel_game::Result;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the published prize list
    Show,
    /// Publish a new prize list, replacing the current one
    Set {
        /// Prize labels, in slice order
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        items: Vec<String>,
        /// Read labels from a file, one per line
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Edit the prize list in $EDITOR
    Edit,
}

pub async fn handle_config_command(cmd: ConfigCommands, app: &App) -> Result<()> {
    let moderator = app.moderator();

    match cmd {
        ConfigCommands::Show => match moderator.current().await? {
            Some(config) if config.is_empty() => {
                println!("The published prize list is empty; spins are disabled.");
            }
            Some(config) => {
                println!("{}", prize_table(&config.items));
            }
            None => {
                println!("No prize list published yet.");
                println!("Participants see the fallback list:");
                println!("{}", prize_table(&app.settings.fallback_items));
            }
        },

        ConfigCommands::Set { items, file } => {
            let config = match file {
                Some(path) => {
                    let text = tokio::fs::read_to_string(&path)
                        .await
                        .map_err(WheelError::from)?;
                    moderator.save(&text).await?
                }
                None => moderator.save_items(items).await?,
            };

            println!("Published {} prizes.", config.len());
        }

        ConfigCommands::Edit => {
            let text = moderator.load_for_edit().await?;

            let edited = Editor::new()
                .extension(".txt")
                .edit(&text)
                .map_err(|e| WheelError::dialog(e.to_string()))?;

            match edited {
                Some(edited) => {
                    let config = moderator.save(&edited).await?;
                    println!("Published {} prizes.", config.len());
                }
                None => println!("Edit cancelled, prize list unchanged."),
            }
        }
    }

    Ok(())
}

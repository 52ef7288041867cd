use super::App;
use dialoguer::Confirm;
use wheel_core::WheelError;
use wheel_game::Result;

pub async fn handle_reset(force: bool, app: &App) -> Result<()> {
    let moderator = app.moderator();

    if !force {
        let count = moderator.history().await?.len();
        if count == 0 {
            println!("No results to delete.");
            return Ok(());
        }

        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete all {} results? Everyone will be able to play again.",
                count
            ))
            .default(false)
            .interact()
            .map_err(|e| WheelError::dialog(e.to_string()))?;

        if !confirmed {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    let report = moderator.clear_history().await?;
    if report.is_complete() {
        println!("Deleted {} results.", report.deleted);
    } else {
        println!("Deleted {} of {} results.", report.deleted, report.total);
    }

    Ok(())
}

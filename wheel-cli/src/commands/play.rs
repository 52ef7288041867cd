use super::{prize_table, App};
use dialoguer::Input;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use wheel_core::WheelError;
use wheel_game::{join_wheel, RecordStatus, Result, SpinFrame};

const BAR_WIDTH: usize = 30;

pub async fn handle_play(
    name: Option<String>,
    shuffle: bool,
    json: bool,
    app: &App,
) -> Result<()> {
    let (mut controller, sync) =
        join_wheel(app.config.as_ref(), app.records.clone(), &app.settings).await?;

    let name = match name {
        Some(name) => name,
        None => Input::<String>::new()
            .with_prompt("Your name")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| WheelError::dialog(e.to_string()))?,
    };

    let result = play(&mut controller, &name, shuffle, json).await;
    sync.abort();
    result
}

async fn play(
    controller: &mut wheel_game::WheelController,
    name: &str,
    shuffle: bool,
    json: bool,
) -> Result<()> {
    let player = controller.login(name).await?.name().to_string();

    let mut rng = StdRng::from_entropy();
    if shuffle {
        controller.shuffle(&mut rng)?;
    }

    if !json {
        println!("Welcome, {}! Today's wheel:", player);
        println!("{}", prize_table(controller.wheel().read().items()));
    }

    let outcome = controller
        .run_spin(&mut rng, |frame| {
            if !json {
                draw_frame(frame);
            }
        })
        .await?;

    if json {
        let output = serde_json::to_string_pretty(&outcome).map_err(WheelError::from)?;
        println!("{}", output);
        return Ok(());
    }

    println!();
    println!(
        "{}, you landed on slice {}: {}",
        outcome.result.player,
        outcome.result.index + 1,
        outcome.result.prize
    );

    match outcome.record {
        RecordStatus::Saved { .. } => println!("Your result has been recorded."),
        RecordStatus::Rejected => {
            println!("A result for {} was already recorded elsewhere.", player);
            println!("Only the first result counts.");
        }
        RecordStatus::Failed { reason } => {
            println!("Your result could not be saved: {}", reason);
            println!("Please show this screen to the moderator.");
        }
    }

    Ok(())
}

/// Labels stay hidden until the wheel stops; only the slice number shows.
fn draw_frame(frame: &SpinFrame) {
    let filled = (frame.progress * BAR_WIDTH as f64).round() as usize;
    let slice = frame
        .slice
        .map(|index| (index + 1).to_string())
        .unwrap_or_else(|| "-".to_string());

    print!(
        "\rSpinning [{}{}] slice {:>3}",
        "#".repeat(filled.min(BAR_WIDTH)),
        " ".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)),
        slice
    );
    let _ = std::io::stdout().flush();
}

pub mod audio;
pub mod chatbot;
pub mod cli;
pub mod controller;
pub mod models;
pub mod session;
pub mod ui;

use audio::load_cue;
use chatbot::new_client as new_chatbot_client;
use cli::Args;
use console::Term;
use controller::ConversationController;
use log::info;
use session::Session;
use std::error::Error;
use tokio::io::BufReader;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let backend = args.backend_base().map_err(|e| format!("Invalid backend URL: {}", e))?;

    info!("--- Core Configuration ---");
    info!("Chatbot URL: {}", args.chatbot_url);
    info!("Backend URL: {}", backend);
    info!("Sound Enabled: {}", !args.no_sound);
    if !args.no_sound {
        info!("Sound Path: {}", args.sound_path.display());
        info!("Sound Player: {}", args.sound_player);
    }
    info!("-------------------------");

    let client = new_chatbot_client(&args.chatbot_config())?;
    let audio = load_cue(&args.sound_config());
    let controller = ConversationController::new(client, audio);

    let term = Term::stdout();
    let interactive = term.is_term();
    let mut session = Session::new(controller, term, backend, interactive);

    let interrupt = session.interrupt_handle();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            interrupt.notify_one();
        }
    });
    session.run(BufReader::new(tokio::io::stdin())).await?;

    Ok(())
}

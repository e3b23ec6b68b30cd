use clap::Parser;
use std::path::PathBuf;
use url::Url;

use crate::audio::SoundConfig;
use crate::chatbot::ChatbotConfig;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Chat-style point of sale for the school canteen", long_about = None)]
pub struct Args {
    // --- Chatbot Service Args ---
    /// Endpoint that receives the operator's commands (POST, JSON body {"message": ...})
    #[arg(long, env = "CHATBOT_URL", default_value = "http://localhost:3000/chatbot")]
    pub chatbot_url: String,

    /// Backend base URL shown in the parents' balance-inquiry hint. Defaults to the chatbot URL's origin.
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,

    // --- Sound Cue Args ---
    /// Sound played when the chatbot reports a sale, recharge or registration
    #[arg(long, env = "SOUND_PATH", default_value = "beep.mp3")]
    pub sound_path: PathBuf,

    /// Player command; the sound file is written to its stdin
    #[arg(long, env = "SOUND_PLAYER", default_value = "mpg123 -q -")]
    pub sound_player: String,

    /// Disable the transaction sound
    #[arg(long, env = "NO_SOUND", default_value = "false")]
    pub no_sound: bool,

    // --- General App Args ---
    /// Enable debug logging
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}

impl Args {
    pub fn chatbot_config(&self) -> ChatbotConfig {
        ChatbotConfig {
            url: self.chatbot_url.clone(),
        }
    }

    pub fn sound_config(&self) -> SoundConfig {
        SoundConfig {
            enabled: !self.no_sound,
            path: self.sound_path.clone(),
            player: self.sound_player.clone(),
        }
    }

    pub fn backend_base(&self) -> Result<Url, url::ParseError> {
        match &self.backend_url {
            Some(s) if !s.trim().is_empty() => Url::parse(s.trim()),
            _ => {
                let chatbot = Url::parse(self.chatbot_url.trim())?;
                chatbot.join("/")
            }
        }
    }

    pub fn log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}

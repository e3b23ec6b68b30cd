//! Best-effort sound cue played when the chatbot reports a transaction.
//!
//! The asset is read once when the cue is built and replayed from memory on
//! every `play`. Playback runs in a detached task, so a slow or broken player
//! never holds up the conversation.

use log::{ debug, error, info, warn };
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::runtime::Handle;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("sound player command is empty")]
    EmptyCommand,

    #[error("no tokio runtime to drive the sound player")]
    NoRuntime,
}

pub trait AudioCue: Send + Sync {
    fn play(&self) -> Result<(), AudioError>;
}

#[derive(Debug, Clone)]
pub struct SoundConfig {
    pub enabled: bool,
    pub path: PathBuf,
    pub player: String,
}

/// Pipes the in-memory asset into an external player's stdin.
#[derive(Debug, Clone)]
pub struct PlayerCue {
    program: String,
    args: Vec<String>,
    asset: Arc<[u8]>,
}

impl PlayerCue {
    pub fn new(player: &str, asset: Vec<u8>) -> Result<Self, AudioError> {
        let mut parts = player.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(AudioError::EmptyCommand)?;
        Ok(Self {
            program,
            args: parts.collect(),
            asset: asset.into(),
        })
    }

    pub fn load(config: &SoundConfig) -> Result<Self, AudioError> {
        let asset = fs::read(&config.path)?;
        info!("Loaded sound cue {} ({} bytes)", config.path.display(), asset.len());
        Self::new(&config.player, asset)
    }
}

impl AudioCue for PlayerCue {
    fn play(&self) -> Result<(), AudioError> {
        let runtime = Handle::try_current().map_err(|_| AudioError::NoRuntime)?;
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let asset = self.asset.clone();
        let program = self.program.clone();
        runtime.spawn(async move {
            if let Some(mut stdin) = child.stdin.take() {
                if let Err(e) = stdin.write_all(&asset).await {
                    error!("Error feeding sound to {}: {}", program, e);
                }
                drop(stdin);
            }
            match child.wait().await {
                Ok(status) if status.success() => debug!("Sound cue played"),
                Ok(status) => warn!("Sound player {} exited with {}", program, status),
                Err(e) => error!("Error waiting for sound player {}: {}", program, e),
            }
        });
        Ok(())
    }
}

/// Rings the terminal bell.
#[derive(Debug, Clone, Default)]
pub struct BellCue;

impl AudioCue for BellCue {
    fn play(&self) -> Result<(), AudioError> {
        let mut out = std::io::stdout();
        out.write_all(b"\x07")?;
        out.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SilentCue;

impl AudioCue for SilentCue {
    fn play(&self) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Builds the session's cue. A missing asset or player falls back to the bell.
pub fn load_cue(config: &SoundConfig) -> Arc<dyn AudioCue> {
    if !config.enabled {
        info!("Sound cue disabled");
        return Arc::new(SilentCue);
    }
    match PlayerCue::load(config) {
        Ok(cue) => Arc::new(cue),
        Err(e) => {
            warn!(
                "Could not load sound cue from {}: {}. Falling back to terminal bell.",
                config.path.display(),
                e
            );
            Arc::new(BellCue)
        }
    }
}

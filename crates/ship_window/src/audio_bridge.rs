//! Narrow entry points the game uses to feed the audio player.

/// Audio output collaborator. Mixing and playback live behind it.
pub trait AudioPlayer {
    fn is_initialized(&self) -> bool;
    /// Samples queued but not yet played.
    fn buffered(&self) -> i32;
    fn desired_buffered(&self) -> i32;
    fn play(&mut self, frame: &[u8]);
}

/// Routes game audio calls to the player when one is up, otherwise does
/// nothing and reports zero.
#[derive(Default)]
pub struct AudioBridge {
    player: Option<Box<dyn AudioPlayer>>,
}

impl AudioBridge {
    pub fn new(player: Option<Box<dyn AudioPlayer>>) -> Self {
        Self { player }
    }

    pub fn set_player(&mut self, player: Option<Box<dyn AudioPlayer>>) {
        self.player = player;
    }

    fn active(&self) -> Option<&dyn AudioPlayer> {
        self.player.as_deref().filter(|p| p.is_initialized())
    }

    pub fn buffered(&self) -> i32 {
        self.active().map_or(0, |p| p.buffered())
    }

    pub fn desired_buffered(&self) -> i32 {
        self.active().map_or(0, |p| p.desired_buffered())
    }

    pub fn play_frame(&mut self, frame: &[u8]) {
        match self.player.as_deref_mut() {
            Some(player) if player.is_initialized() => player.play(frame),
            _ => tracing::trace!("Dropped {} byte audio frame, no player", frame.len()),
        }
    }
}

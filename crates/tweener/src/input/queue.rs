/// Playback requests the host can send.
/// Names and groups are whatever the manifest declares.
#[derive(Debug, Clone, PartialEq)]
pub enum TweenCommand {
    Play(String),
    PlayGroup(String),
    Rewind(String),
    RewindGroup(String),
    /// Play when `forward`, rewind otherwise.
    Toggle { name: String, forward: bool },
    /// Play the group when `forward`, rewind it otherwise.
    ToggleGroup { group: String, forward: bool },
    /// Start every configured animation.
    PlayAll,
    /// Stop everything and restore initial state.
    StopAll,
}

/// A queue of tween commands.
/// JS (or any UI glue) pushes commands; Rust drains and applies them each frame.
pub struct CommandQueue {
    commands: Vec<TweenCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(16),
        }
    }

    /// Push a new command (called from JS via wasm-bindgen).
    pub fn push(&mut self, command: TweenCommand) {
        self.commands.push(command);
    }

    /// Drain all pending commands in arrival order.
    pub fn drain(&mut self) -> Vec<TweenCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

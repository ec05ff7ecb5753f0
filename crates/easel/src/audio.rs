//! Audio capability.
//!
//! Playback is delegated to an [`AudioSink`]. The drawing thread only queues
//! requests on the coordinator; the host drains them once per frame and hands
//! them to its sink.

use std::path::{Path, PathBuf};

use crate::assets::Sound;

/// A queued audio request.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCommand {
    /// Play a sound effect once.
    Play(Sound),
    /// Start looping background music from a file, replacing any current track.
    Music(PathBuf),
}

/// Something that can play sounds.
pub trait AudioSink: Send {
    fn play(&mut self, sound: &Sound);
    fn music(&mut self, path: &Path);

    /// Routes one queued command to `play` or `music`.
    fn dispatch(&mut self, command: &AudioCommand) {
        match command {
            AudioCommand::Play(sound) => self.play(sound),
            AudioCommand::Music(path) => self.music(path),
        }
    }
}

/// Default sink: records each request in the log and plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, sound: &Sound) {
        match sound.path() {
            Some(path) => log::info!("play sound {}", path.display()),
            None => log::debug!("ignoring play of an invalid sound"),
        }
    }

    fn music(&mut self, path: &Path) {
        log::info!("play music {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        played: usize,
        music: Vec<PathBuf>,
    }

    impl AudioSink for Recorder {
        fn play(&mut self, _sound: &Sound) {
            self.played += 1;
        }

        fn music(&mut self, path: &Path) {
            self.music.push(path.to_path_buf());
        }
    }

    #[test]
    fn dispatch_routes_commands() {
        let mut sink = Recorder::default();
        sink.dispatch(&AudioCommand::Play(Sound::default()));
        sink.dispatch(&AudioCommand::Music(PathBuf::from("theme.ogg")));
        assert_eq!(sink.played, 1);
        assert_eq!(sink.music, vec![PathBuf::from("theme.ogg")]);
    }
}

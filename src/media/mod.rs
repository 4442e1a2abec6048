//! Audio capture.
//!
//! A capture source pushes encoded chunks while recording; completing the
//! capture yields one upload containing every chunk in arrival order.

use thiserror::Error;

use crate::api::AudioUpload;

pub const RECORDING_FILE_NAME: &str = "recording.wav";
pub const RECORDING_MIME: &str = "audio/wav";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("Microphone access denied")]
    AccessDenied,

    #[error("Recording already in progress")]
    AlreadyRecording,

    #[error("Recording is still in progress")]
    StillRecording,

    #[error("Nothing was recorded")]
    Empty,
}

/// Recording lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Inactive,
    Recording,
    Stopped,
}

/// A source of recorded audio.
pub trait AudioCapture: Send {
    /// Begin a new recording, discarding any previous one.
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Stop recording. Stopping an inactive capture does nothing.
    fn stop(&mut self);

    /// Accept a chunk of recorded audio.
    fn on_data(&mut self, chunk: &[u8]);

    /// Take the finished recording.
    fn on_complete(&mut self) -> Result<AudioUpload, CaptureError>;

    fn state(&self) -> CaptureState;
}

/// Collects chunks in memory.
#[derive(Debug)]
pub struct BufferedRecorder {
    state: CaptureState,
    chunks: Vec<Vec<u8>>,
    permitted: bool,
}

impl Default for BufferedRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferedRecorder {
    pub fn new() -> Self {
        Self {
            state: CaptureState::Inactive,
            chunks: Vec::new(),
            permitted: true,
        }
    }

    /// A recorder whose device refuses access.
    pub fn denied() -> Self {
        Self {
            permitted: false,
            ..Self::new()
        }
    }

    /// Start when inactive, stop when recording.
    pub fn toggle(&mut self) -> Result<CaptureState, CaptureError> {
        if self.state == CaptureState::Recording {
            self.stop();
        } else {
            self.start()?;
        }
        Ok(self.state)
    }

    pub fn recorded_bytes(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }
}

impl AudioCapture for BufferedRecorder {
    fn start(&mut self) -> Result<(), CaptureError> {
        if !self.permitted {
            return Err(CaptureError::AccessDenied);
        }
        if self.state == CaptureState::Recording {
            return Err(CaptureError::AlreadyRecording);
        }
        self.chunks.clear();
        self.state = CaptureState::Recording;
        tracing::debug!("Recording started");
        Ok(())
    }

    fn stop(&mut self) {
        if self.state != CaptureState::Recording {
            return;
        }
        self.state = CaptureState::Stopped;
        tracing::debug!(chunks = self.chunks.len(), bytes = self.recorded_bytes(), "Recording stopped");
    }

    fn on_data(&mut self, chunk: &[u8]) {
        if self.state != CaptureState::Recording {
            tracing::debug!(len = chunk.len(), "Dropping audio chunk outside a recording");
            return;
        }
        if !chunk.is_empty() {
            self.chunks.push(chunk.to_vec());
        }
    }

    fn on_complete(&mut self) -> Result<AudioUpload, CaptureError> {
        match self.state {
            CaptureState::Recording => return Err(CaptureError::StillRecording),
            CaptureState::Inactive => return Err(CaptureError::Empty),
            CaptureState::Stopped => {}
        }
        self.state = CaptureState::Inactive;
        if self.chunks.is_empty() {
            return Err(CaptureError::Empty);
        }

        let bytes = std::mem::take(&mut self.chunks).concat();
        Ok(AudioUpload {
            file_name: RECORDING_FILE_NAME.to_string(),
            mime: RECORDING_MIME.to_string(),
            bytes,
        })
    }

    fn state(&self) -> CaptureState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_joined_in_order() {
        let mut recorder = BufferedRecorder::new();
        recorder.start().unwrap();
        recorder.on_data(b"RIFF");
        recorder.on_data(b"");
        recorder.on_data(b"data");
        recorder.stop();

        let upload = recorder.on_complete().unwrap();
        assert_eq!(upload.bytes, b"RIFFdata");
        assert_eq!(upload.file_name, "recording.wav");
        assert_eq!(upload.mime, "audio/wav");
        assert_eq!(recorder.state(), CaptureState::Inactive);
    }

    #[test]
    fn test_stop_when_inactive_is_noop() {
        let mut recorder = BufferedRecorder::new();
        recorder.stop();
        assert_eq!(recorder.state(), CaptureState::Inactive);
        assert_eq!(recorder.on_complete().unwrap_err(), CaptureError::Empty);
    }

    #[test]
    fn test_data_outside_recording_dropped() {
        let mut recorder = BufferedRecorder::new();
        recorder.on_data(b"early");
        recorder.start().unwrap();
        recorder.on_data(b"kept");
        recorder.stop();
        recorder.on_data(b"late");
        assert_eq!(recorder.recorded_bytes(), 4);
    }

    #[test]
    fn test_complete_while_recording() {
        let mut recorder = BufferedRecorder::new();
        recorder.start().unwrap();
        assert_eq!(recorder.start().unwrap_err(), CaptureError::AlreadyRecording);
        assert_eq!(recorder.on_complete().unwrap_err(), CaptureError::StillRecording);
    }

    #[test]
    fn test_toggle_and_denied() {
        let mut recorder = BufferedRecorder::new();
        assert_eq!(recorder.toggle().unwrap(), CaptureState::Recording);
        assert_eq!(recorder.toggle().unwrap(), CaptureState::Stopped);

        let mut denied = BufferedRecorder::denied();
        assert_eq!(denied.toggle().unwrap_err(), CaptureError::AccessDenied);
    }
}

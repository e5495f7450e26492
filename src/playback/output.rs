use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum OutputError {
    #[error("No output device available")]
    DeviceUnavailable,
    #[error("Failed to open stream: {0}")]
    StreamFailed(String),
}

/// Event emitted by an output handle after playback has started.
#[derive(Debug, Clone)]
pub enum OutputEvent {
    /// The stream played through to the end.
    Ended,
    /// The device or stream failed mid-playback.
    Error(String),
}

pub type OutputCallback = Box<dyn Fn(OutputEvent) + Send + Sync>;

/// Backend that binds a stream URL to the one physical audio output.
///
/// The coordinator owns every handle this returns; rows never see one.
pub trait AudioOutput: Send + Sync {
    /// Bind `url` to a fresh handle and start playing from position zero.
    ///
    /// `on_event` must be invoked from the backend's own task or thread,
    /// never synchronously from inside `start` or a handle method.
    fn start(
        &self,
        url: &str,
        on_event: OutputCallback,
    ) -> Result<Box<dyn OutputHandle>, OutputError>;
}

pub trait OutputHandle: Send {
    /// Pause in place, retaining the playback position.
    fn pause(&mut self);
    /// Continue from the position `pause` retained.
    fn resume(&mut self);
    /// Tear down the stream and discard the position.
    fn stop(&mut self);
}

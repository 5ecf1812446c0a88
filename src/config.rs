use crate::framerate::FrameRate;
use crate::rescaler::Rescaler;

pub const DEFAULT_FRAME_RATE: &str = "29.97";
pub const DEFAULT_OUTPUT: &str = "output.srt";

/// Everything one run needs. `-` as a path means a standard stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input: String,
    pub output: String,
    pub source_rate: FrameRate,
    pub target_rate: FrameRate,
}

impl Config {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: DEFAULT_OUTPUT.to_string(),
            source_rate: FrameRate::DEFAULT,
            target_rate: FrameRate::DEFAULT,
        }
    }

    pub fn rescaler(&self) -> Rescaler {
        Rescaler::new(self.source_rate, self.target_rate)
    }
}

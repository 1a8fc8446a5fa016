use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Which generation task the inference script should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum InferenceTask {
    #[default]
    #[serde(rename = "i2v-14B")]
    ImageToVideo14B,
    #[serde(rename = "t2v-14B")]
    TextToVideo14B,
    #[serde(rename = "i2v-7B")]
    ImageToVideo7B,
}

impl InferenceTask {
    pub const ALL: [InferenceTask; 3] = [
        InferenceTask::ImageToVideo14B,
        InferenceTask::TextToVideo14B,
        InferenceTask::ImageToVideo7B,
    ];

    /// Value passed to `--task`.
    pub fn as_arg(self) -> &'static str {
        match self {
            InferenceTask::ImageToVideo14B => "i2v-14B",
            InferenceTask::TextToVideo14B => "t2v-14B",
            InferenceTask::ImageToVideo7B => "i2v-7B",
        }
    }
}

impl fmt::Display for InferenceTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}

impl FromStr for InferenceTask {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        InferenceTask::ALL
            .into_iter()
            .find(|t| t.as_arg().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("invalid task: {s} (expected one of \"i2v-14B\", \"t2v-14B\", \"i2v-7B\")")
            })
    }
}

/// Output resolution, written `WIDTH*HEIGHT` as the script expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum FrameSize {
    #[default]
    #[serde(rename = "960*544")]
    W960H544,
    #[serde(rename = "1280*720")]
    W1280H720,
    #[serde(rename = "640*480")]
    W640H480,
    #[serde(rename = "512*512")]
    W512H512,
}

impl FrameSize {
    pub const ALL: [FrameSize; 4] = [
        FrameSize::W960H544,
        FrameSize::W1280H720,
        FrameSize::W640H480,
        FrameSize::W512H512,
    ];

    /// Value passed to `--size`.
    pub fn as_arg(self) -> &'static str {
        match self {
            FrameSize::W960H544 => "960*544",
            FrameSize::W1280H720 => "1280*720",
            FrameSize::W640H480 => "640*480",
            FrameSize::W512H512 => "512*512",
        }
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}

impl FromStr for FrameSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(['x', 'X'], "*");
        FrameSize::ALL
            .into_iter()
            .find(|size| size.as_arg() == normalized)
            .ok_or_else(|| {
                format!(
                    "invalid size: {} (expected one of \"960*544\", \"1280*720\", \"640*480\", \"512*512\")",
                    s.trim()
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_parses_case_insensitively() {
        assert_eq!("T2V-14b".parse::<InferenceTask>(), Ok(InferenceTask::TextToVideo14B));
        assert!("v2v".parse::<InferenceTask>().is_err());
    }

    #[test]
    fn defaults_match_the_shipped_form() {
        assert_eq!(InferenceTask::default().as_arg(), "i2v-14B");
        assert_eq!(FrameSize::default().as_arg(), "960*544");
    }

    #[test]
    fn size_accepts_x_separator() {
        assert_eq!("1280x720".parse::<FrameSize>(), Ok(FrameSize::W1280H720));
        assert_eq!("512*512".parse::<FrameSize>(), Ok(FrameSize::W512H512));
        assert!("100*100".parse::<FrameSize>().is_err());
    }
}

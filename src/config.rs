use crate::spiral::Viewport;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_WINDOW_WIDTH: f32 = 1280.0;
const DEFAULT_WINDOW_HEIGHT: f32 = 720.0;
pub const INPUT_PANEL_WIDTH: f32 = 300.0;
const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(10);
pub const BINARY_FILE_NAME: &str = "fibonacci.bin";
pub const TEXT_FILE_NAME: &str = "fibonacci.txt";

/// Startup settings for the app and its spiral sessions.
#[derive(Debug, Clone)]
pub struct SpiralSettings {
    pub window_width: f32,
    pub window_height: f32,
    // Directory that receives fibonacci.bin / fibonacci.txt when saving
    pub output_dir: PathBuf,
    // How long a session may stay in Building before it is abandoned
    pub ready_timeout: Duration,
    pub first_input: String,
    pub second_input: String,
}

impl SpiralSettings {
    pub fn binary_output_path(&self) -> PathBuf {
        self.output_dir.join(BINARY_FILE_NAME)
    }

    pub fn text_output_path(&self) -> PathBuf {
        self.output_dir.join(TEXT_FILE_NAME)
    }

    /// Drawing area left of the window once the input panel is laid out.
    pub fn initial_canvas(&self) -> Viewport {
        Viewport::new(
            (self.window_width - INPUT_PANEL_WIDTH).max(1.0),
            self.window_height,
        )
    }
}

impl Default for SpiralSettings {
    fn default() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            output_dir: PathBuf::from("."),
            ready_timeout: DEFAULT_READY_TIMEOUT,
            first_input: "1".to_string(),
            second_input: "20".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_paths_live_in_output_dir() {
        let settings = SpiralSettings {
            output_dir: PathBuf::from("/tmp/spiral"),
            ..Default::default()
        };
        assert_eq!(
            settings.binary_output_path(),
            PathBuf::from("/tmp/spiral/fibonacci.bin")
        );
        assert_eq!(
            settings.text_output_path(),
            PathBuf::from("/tmp/spiral/fibonacci.txt")
        );
    }

    #[test]
    fn initial_canvas_excludes_input_panel() {
        let settings = SpiralSettings::default();
        assert_eq!(settings.initial_canvas(), Viewport::new(980.0, 720.0));

        let narrow = SpiralSettings {
            window_width: 200.0,
            ..Default::default()
        };
        assert_eq!(narrow.initial_canvas().width, 1.0);
    }
}

//! Writes rasterised frames to disk and joins them into a flipbook.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::canvas::compute_arm_grid;
use crate::simulation::driver::{ArmView, Renderer};

/// Frame separator inside the flipbook.
pub const FRAME_SEPARATOR: char = '\u{0C}';

pub const DEFAULT_ROWS: usize = 32;
pub const DEFAULT_COLS: usize = 64;

/// `<name>` followed by exactly eight digits and `.txt`.
fn is_frame_file(file_name: &str, name: &str) -> bool {
    file_name
        .strip_prefix(name)
        .and_then(|rest| rest.strip_suffix(".txt"))
        .is_some_and(|index| index.len() == 8 && index.bytes().all(|b| b.is_ascii_digit()))
}

/// Saves one text file per rendered view: `<dir>/<name>00000000.txt`, ...
#[derive(Debug)]
pub struct FrameRecorder {
    dir: PathBuf,
    name: String,
    frame: u64,
    rows: usize,
    cols: usize,
    arm_length: f64,
}

impl FrameRecorder {
    /// Creates `dir` if needed and removes frames left by an earlier run
    /// with the same `name`.
    ///
    /// # Errors
    /// The directory cannot be created or listed.
    pub fn new(dir: impl AsRef<Path>, name: &str, arm_length: f64) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let mut removed = 0_usize;
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            let stale = path
                .file_name()
                .and_then(|f| f.to_str())
                .is_some_and(|f| is_frame_file(f, name));
            if stale {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        debug!(dir = %dir.display(), removed, "recorder ready");

        Ok(Self {
            dir,
            name: name.to_string(),
            frame: 0,
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            arm_length,
        })
    }

    #[must_use]
    pub fn with_size(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Number of frames saved so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frame
    }

    fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("{}{index:08}.txt", self.name))
    }

    /// Writes the next frame.
    ///
    /// # Errors
    /// The file cannot be written.
    pub fn save_frame(&mut self, lines: &[String]) -> io::Result<PathBuf> {
        let path = self.frame_path(self.frame);
        fs::write(&path, lines.join("\n"))?;
        self.frame += 1;
        Ok(path)
    }

    /// Concatenates every saved frame into `<dir>/<name>.flip`.
    ///
    /// # Errors
    /// A frame cannot be read or the flipbook cannot be written.
    pub fn assemble(&self) -> io::Result<PathBuf> {
        let mut book = String::new();
        for index in 0..self.frame {
            if index > 0 {
                book.push('\n');
                book.push(FRAME_SEPARATOR);
                book.push('\n');
            }
            book.push_str(&fs::read_to_string(self.frame_path(index))?);
        }
        let path = self.dir.join(format!("{}.flip", self.name));
        fs::write(&path, book)?;
        Ok(path)
    }
}

impl Renderer for FrameRecorder {
    fn render(&mut self, view: &ArmView) {
        let grid = compute_arm_grid(view, self.arm_length, self.rows, self.cols);
        if let Err(err) = self.save_frame(&grid) {
            warn!(%err, tick = view.tick, "could not save frame");
        }
    }

    fn finish(&mut self) {
        match self.assemble() {
            Ok(path) => debug!(path = %path.display(), frames = self.frame, "flipbook written"),
            Err(err) => warn!(%err, "could not assemble flipbook"),
        }
    }
}

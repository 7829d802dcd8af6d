use std::fs;
use std::path::PathBuf;

use active_arm::simulation::{Simulation, SimulationConfig};
use active_arm::ui::recorder::{FRAME_SEPARATOR, FrameRecorder};

fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("active_arm_{test}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_clears_stale_frames() {
    let dir = scratch_dir("stale");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("arm00000042.txt"), "old").unwrap();
    fs::write(dir.join("keep.txt"), "other").unwrap();
    fs::write(dir.join("armchair.txt"), "user file").unwrap();

    let recorder = FrameRecorder::new(&dir, "arm", 1.0).unwrap();

    assert_eq!(recorder.frames(), 0);
    assert!(!dir.join("arm00000042.txt").exists());
    assert!(dir.join("keep.txt").exists());
    assert!(dir.join("armchair.txt").exists());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_save_frame_numbers_files() {
    let dir = scratch_dir("numbers");
    let mut recorder = FrameRecorder::new(&dir, "arm", 1.0).unwrap();

    let first = recorder.save_frame(&["ab".to_string(), "cd".to_string()]).unwrap();
    let second = recorder.save_frame(&["ef".to_string()]).unwrap();

    assert_eq!(first, dir.join("arm00000000.txt"));
    assert_eq!(second, dir.join("arm00000001.txt"));
    assert_eq!(fs::read_to_string(first).unwrap(), "ab\ncd");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_run_writes_flipbook() {
    let dir = scratch_dir("flipbook");
    let mut config = SimulationConfig::default().with_seed(6);
    config.ticks = 300;
    config.render_every = 100;
    let mut recorder = FrameRecorder::new(&dir, "arm", config.arm_length)
        .unwrap()
        .with_size(12, 24);

    Simulation::new(config).unwrap().run(&mut recorder).unwrap();

    assert_eq!(recorder.frames(), 3);
    let book = fs::read_to_string(dir.join("arm.flip")).unwrap();
    assert_eq!(book.matches(FRAME_SEPARATOR).count(), 2);
    assert_eq!(book.lines().filter(|l| !l.starts_with(FRAME_SEPARATOR)).count(), 36);
    let _ = fs::remove_dir_all(&dir);
}

//! Command-line tests against the built `rotobatch` binary.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Fixture {
    root: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        std::fs::create_dir(root.path().join("in")).unwrap();
        std::fs::write(root.path().join("config.json"), "{}").unwrap();
        Self { root }
    }

    fn input(&self) -> std::path::PathBuf {
        self.root.path().join("in")
    }

    fn output(&self) -> std::path::PathBuf {
        self.root.path().join("out")
    }

    fn add_image(&self, name: &str, width: u32, height: u32, rgb: [u8; 3]) {
        write_solid(&self.input().join(name), width, height, rgb);
    }

    fn write_config(&self, json: &str) {
        std::fs::write(self.root.path().join("config.json"), json).unwrap();
    }

    /// The binary with a config file private to this fixture.
    fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_rotobatch"));
        cmd.env("ROTOBATCH_CONFIG", self.root.path().join("config.json"))
            .env_remove("RUST_LOG");
        cmd
    }

    fn rotate(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("rotate")
            .arg("--input")
            .arg(self.input())
            .arg("--output")
            .arg(self.output());
        cmd
    }
}

fn write_solid(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
    image::RgbImage::from_pixel(width, height, image::Rgb(rgb))
        .save(path)
        .unwrap();
}

#[test]
fn test_help_lists_commands() {
    Command::new(env!("CARGO_BIN_EXE_rotobatch"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("rotate"))
        .stdout(predicate::str::contains("average-color"))
        .stdout(predicate::str::contains("interactive"));
}

#[test]
fn test_rotate_writes_all_outputs() {
    let fx = Fixture::new();
    fx.add_image("photo.jpg", 200, 100, [10, 120, 10]);
    fx.add_image("scan.png", 30, 40, [0, 0, 0]);

    fx.rotate()
        .args(["--angles", "90,180", "--background", "#ffffff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 4 files for 2 images"));

    for name in [
        "photo_rotated_90.jpg",
        "photo_rotated_180.jpg",
        "scan_rotated_90.png",
        "scan_rotated_180.png",
    ] {
        assert!(fx.output().join(name).is_file(), "missing {name}");
    }

    let rotated = image::open(fx.output().join("photo_rotated_90.jpg")).unwrap();
    assert_eq!((rotated.width(), rotated.height()), (200, 100));
}

#[test]
fn test_negative_angle_is_accepted() {
    let fx = Fixture::new();
    fx.add_image("a.png", 8, 8, [1, 2, 3]);

    fx.rotate()
        .args(["--angles", "-45"])
        .assert()
        .success();
    assert!(fx.output().join("a_rotated_-45.png").is_file());
}

#[test]
fn test_invalid_angles_exit_code() {
    let fx = Fixture::new();
    fx.add_image("a.png", 4, 4, [1, 2, 3]);

    fx.rotate()
        .args(["--angles", "45,abc"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("abc"));
    assert!(!fx.output().exists());
}

#[test]
fn test_color_without_hash_exit_code() {
    let fx = Fixture::new();
    fx.rotate()
        .args(["--angles", "90", "--background", "00ff00"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("'#'"));
    assert!(!fx.output().exists());
}

#[test]
fn test_missing_angles_exit_code() {
    let fx = Fixture::new();
    fx.rotate()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("At least one rotation angle"));
}

#[test]
fn test_angles_from_config() {
    let fx = Fixture::new();
    fx.add_image("a.bmp", 5, 3, [9, 9, 9]);
    fx.write_config(r##"{"angles": [0, 270], "background": "#000"}"##);

    fx.rotate().assert().success();
    assert!(fx.output().join("a_rotated_0.bmp").is_file());
    assert!(fx.output().join("a_rotated_270.bmp").is_file());
}

#[test]
fn test_malformed_config_fails() {
    let fx = Fixture::new();
    fx.write_config("{ nope");
    fx.rotate()
        .args(["--angles", "90"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid config file"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let fx = Fixture::new();
    fx.add_image("photo.png", 4, 4, [1, 2, 3]);

    fx.rotate()
        .args(["--angles", "90,180", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("photo_rotated_90.png"))
        .stdout(predicate::str::contains("photo_rotated_180.png"));
    assert!(!fx.output().exists());
}

#[test]
fn test_corrupt_file_fails_fast() {
    let fx = Fixture::new();
    std::fs::write(fx.input().join("broken.png"), b"garbage").unwrap();

    fx.rotate()
        .args(["--angles", "90"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("broken.png"));
}

#[test]
fn test_keep_going_reports_incomplete() {
    let fx = Fixture::new();
    std::fs::write(fx.input().join("broken.png"), b"garbage").unwrap();
    fx.add_image("fine.png", 4, 4, [1, 2, 3]);

    fx.rotate()
        .args(["--angles", "90", "--keep-going"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Wrote 1 files for 1 images"))
        .stderr(predicate::str::contains("1 of 2 images could not be processed"));
    assert!(fx.output().join("fine_rotated_90.png").is_file());
}

#[test]
fn test_background_from_image() {
    let fx = Fixture::new();
    fx.add_image("a.png", 10, 10, [255, 0, 0]);
    let swatch = fx.root.path().join("swatch.png");
    write_solid(&swatch, 2, 2, [0, 0, 255]);

    fx.rotate()
        .args(["--angles", "90"])
        .arg("--background-from")
        .arg(&swatch)
        .assert()
        .success();
    assert!(fx.output().join("a_rotated_90.png").is_file());
}

#[test]
fn test_background_flags_conflict() {
    let fx = Fixture::new();
    fx.rotate()
        .args(["--angles", "90", "--background", "#fff", "--background-from", "x.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_average_color() {
    let fx = Fixture::new();
    let swatch = fx.root.path().join("swatch.png");
    write_solid(&swatch, 3, 2, [16, 32, 255]);

    fx.cmd()
        .arg("average-color")
        .arg(&swatch)
        .assert()
        .success()
        .stdout("#1020ff\n");
}

#[test]
fn test_average_color_unreadable() {
    let fx = Fixture::new();
    fx.cmd()
        .arg("average-color")
        .arg(fx.root.path().join("missing.png"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing.png"));
}

#[test]
fn test_interactive_session() {
    let fx = Fixture::new();
    fx.add_image("a.gif", 6, 6, [50, 60, 70]);

    let answers = format!(
        "{}\n{}\n90, 270\nn\n#123456\n",
        fx.input().display(),
        fx.output().display()
    );
    fx.cmd()
        .arg("interactive")
        .write_stdin(answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Done: Image processing complete!"));

    assert!(fx.output().join("a_rotated_90.gif").is_file());
    assert!(fx.output().join("a_rotated_270.gif").is_file());
}

#[test]
fn test_interactive_invalid_angles() {
    let fx = Fixture::new();
    let answers = format!(
        "{}\n{}\n45,abc\nn\n\n",
        fx.input().display(),
        fx.output().display()
    );
    fx.cmd()
        .arg("interactive")
        .write_stdin(answers)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Input error"))
        .stderr(predicate::str::contains("error:").not());
    assert!(!fx.output().exists());
}

#[test]
fn test_interactive_batch_failure_reported_once() {
    let fx = Fixture::new();
    std::fs::write(fx.input().join("broken.png"), b"garbage").unwrap();

    let answers = format!(
        "{}\n{}\n90\nn\n\n",
        fx.input().display(),
        fx.output().display()
    );
    fx.cmd()
        .arg("interactive")
        .write_stdin(answers)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Rotation failed"))
        .stderr(predicate::str::contains("error:").not());
}

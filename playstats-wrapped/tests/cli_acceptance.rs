use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
    history_dir: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");
        let history_dir = base.join("export");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");
        fs::create_dir_all(&history_dir).expect("failed to create export dir");

        seed_history_fixture(&history_dir);

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_config,
            xdg_state,
            history_dir,
        }
    }

    fn write_config(&self, content: &str) {
        let dir = self.xdg_config.join("playstats");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(dir.join("config.toml"), content).expect("failed to write config");
    }
}

fn seed_history_fixture(dir: &Path) {
    let source = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../playstats-core/tests/fixtures/Streaming_History_Audio_2023.json");
    fs::copy(source, dir.join("Streaming_History_Audio_2023.json"))
        .expect("failed to copy history fixture");
}

fn run_wrapped(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("playstats-wrapped"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute playstats-wrapped: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "playstats-wrapped {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

#[test]
fn terminal_summary_for_history_directory() {
    let env = CliTestEnv::new();
    let dir = env.history_dir.to_string_lossy().into_owned();
    let args = [dir.as_str(), "--serious"];

    let output = run_wrapped(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Listening Summary"));
    assert!(stdout.contains("2023-01 to 2023-03"));
    assert!(stdout.contains("Midnight City - M83"));
    assert!(
        stdout.contains("Peak month: February 2023"),
        "expected peak month in stdout, got:\n{stdout}"
    );
}

#[test]
fn json_export_contains_rankings_and_provenance() {
    let env = CliTestEnv::new();
    let dir = env.history_dir.to_string_lossy().into_owned();
    let args = [dir.as_str(), "--export", "json"];

    let output = run_wrapped(&env, &args);
    assert_success(&args, &output);

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["provenance"]["total_records_read"], 9);
    assert_eq!(json["provenance"]["song_records_used"], 7);
    assert_eq!(json["totals"]["unique_songs"], 3);
    assert_eq!(json["top_by_plays"][0]["song"], "Midnight City");
    assert_eq!(json["peak_month"]["month"], "2023-02");
    assert_eq!(json["peak_year"]["year"], 2023);
    assert_eq!(json["top_skipped"].as_array().map(|a| a.len()), Some(2));
}

#[test]
fn markdown_export_uses_configured_history_dir_and_caps() {
    let env = CliTestEnv::new();
    env.write_config(&format!(
        "[input]\nhistory_dir = {:?}\n\n[report]\ntop_count = 1\n",
        env.history_dir.to_string_lossy()
    ));
    let args = ["--export", "md"];

    let output = run_wrapped(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("## Top Songs by Plays"));
    assert!(stdout.contains("| 1 | Midnight City | M83 |"));
    assert!(!stdout.contains("| 2 | Dreams |"));
}

#[test]
fn podcast_only_history_fails_with_no_usable_records() {
    let env = CliTestEnv::new();
    let file = env.history_dir.join("podcasts.json");
    fs::write(
        &file,
        r#"[{"ts": "2023-01-04T19:02:11Z", "ms_played": 1800000,
             "episode_name": "Episode 112", "spotify_episode_uri": "spotify:episode:1"}]"#,
    )
    .expect("failed to write podcast history");

    let path = file.to_string_lossy().into_owned();
    let output = run_wrapped(&env, &[path.as_str()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("no usable song records"),
        "expected fatal message in stderr, got:\n{stderr}"
    );
}

#[test]
fn unknown_export_format_is_rejected() {
    let env = CliTestEnv::new();
    let dir = env.history_dir.to_string_lossy().into_owned();
    let output = run_wrapped(&env, &[dir.as_str(), "--export", "xlsx"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown export format"));
}

//! Tests for score persistence and config loading
//!
//! These share files under the system temp directory, so they run serially.

use std::fs;
use std::path::PathBuf;

use serial_test::serial;
use tetris::config::{Difficulty, SessionConfig};
use tetris::scores::{load_leaderboard, FileScoreSink, MemoryScoreSink, ScoreRecord, ScoreSink};

fn scratch_file(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("tetris-tests-{}", name));
    let _ = fs::remove_file(&path);
    path
}

fn record(name: &str, minutes: u64, seconds: u64, score: u32) -> ScoreRecord {
    ScoreRecord {
        name: name.to_string(),
        minutes,
        seconds,
        score,
    }
}

// ============================================================================
// Record Format Tests
// ============================================================================

mod record_format {
    use super::*;

    #[test]
    fn line_has_four_colon_separated_fields() {
        assert_eq!(record("ada", 3, 7, 120).to_line(), "ada:3:7:120");
    }

    #[test]
    fn colon_in_name_is_replaced() {
        let line = record("a:b", 0, 1, 5).to_line();

        assert_eq!(line, "a_b:0:1:5");
        assert_eq!(ScoreRecord::parse_line(&line).unwrap().name, "a_b");
    }

    #[test]
    fn parse_reads_fields_in_order() {
        let parsed = ScoreRecord::parse_line("grace:12:59:840\n").unwrap();

        assert_eq!(parsed, record("grace", 12, 59, 840));
    }

    #[test]
    fn parse_rejects_wrong_field_count() {
        assert!(ScoreRecord::parse_line("ada:1:2").is_err());
        assert!(ScoreRecord::parse_line("ada:1:2:3:4").is_err());
    }

    #[test]
    fn parse_rejects_non_numeric_fields() {
        let err = ScoreRecord::parse_line("ada:one:2:3").unwrap_err();
        assert!(format!("{:#}", err).contains("minutes"));
        assert!(ScoreRecord::parse_line("ada:1:2:-3").is_err());
    }
}

// ============================================================================
// Score Sink Tests
// ============================================================================

mod sinks {
    use super::*;

    #[test]
    #[serial]
    fn file_sink_appends_one_line_per_record() {
        let path = scratch_file("append.txt");
        let mut sink = FileScoreSink::new(&path);

        sink.submit(&record("ada", 1, 2, 40)).unwrap();
        sink.submit(&record("bob", 0, 30, 20)).unwrap();

        let text = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(text, "ada:1:2:40\nbob:0:30:20\n");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn memory_sink_keeps_records() {
        let mut sink = MemoryScoreSink::default();

        sink.submit(&record("ada", 0, 5, 0)).unwrap();

        assert_eq!(sink.records, vec![record("ada", 0, 5, 0)]);
    }

    #[test]
    #[serial]
    fn game_over_record_reaches_the_file() {
        use tetris::game::{GameEvent, Playfield, SequenceSource, Session, TetrominoKind, SPAWN_COLUMN};
        use tetris::game::{test_helpers::*, Cell};

        let path = scratch_file("game-over.txt");
        let mut sink = FileScoreSink::new(&path);
        let mut grid = empty_grid();
        grid.set_cell(SPAWN_COLUMN, 0, Cell::Locked(TetrominoKind::Square));
        let mut session = Session::with_playfield(
            test_config(),
            Box::new(SequenceSource::new(vec![TetrominoKind::Square])),
            Playfield::with_grid(grid),
        );

        session.advance();
        for event in session.take_events() {
            if let GameEvent::GameOver(record) = event {
                sink.submit(&record).unwrap();
            }
        }

        let board = load_leaderboard(&path).unwrap();
        assert_eq!(board, vec![record("tester", 0, 0, 0)]);
        let _ = fs::remove_file(&path);
    }
}

// ============================================================================
// Leaderboard Tests
// ============================================================================

mod leaderboard {
    use super::*;

    #[test]
    #[serial]
    fn missing_file_is_empty() {
        let path = scratch_file("missing.txt");

        assert!(load_leaderboard(&path).unwrap().is_empty());
    }

    #[test]
    #[serial]
    fn entries_sorted_best_first() {
        let path = scratch_file("sorted.txt");
        fs::write(&path, "low:0:10:20\nhigh:2:0:300\nmid:1:0:120\n").unwrap();

        let board = load_leaderboard(&path).unwrap();

        let scores: Vec<u32> = board.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![300, 120, 20]);
        assert_eq!(board[0].name, "high");
        let _ = fs::remove_file(&path);
    }

    #[test]
    #[serial]
    fn malformed_and_blank_lines_are_skipped() {
        let path = scratch_file("malformed.txt");
        fs::write(&path, "ada:1:2:40\n\ngarbage\nbob:x:0:10\ncy:0:3:60\n").unwrap();

        let board = load_leaderboard(&path).unwrap();

        assert_eq!(board, vec![record("cy", 0, 3, 60), record("ada", 1, 2, 40)]);
        let _ = fs::remove_file(&path);
    }
}

// ============================================================================
// Config Loading Tests
// ============================================================================

mod config_file {
    use super::*;

    #[test]
    #[serial]
    fn loads_json_config() {
        let path = scratch_file("config.json");
        fs::write(
            &path,
            r#"{ "player_name": "ada", "difficulty": "Hard", "tick_interval_ms": 400, "row_reward": 40, "seed": 3 }"#,
        )
        .unwrap();

        let config = SessionConfig::load(&path).unwrap();

        assert_eq!(
            config,
            SessionConfig::for_difficulty("ada", Difficulty::Hard).with_seed(3)
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    #[serial]
    fn missing_config_reports_path() {
        let path = scratch_file("no-such-config.json");

        let err = SessionConfig::load(&path).unwrap_err();

        assert!(format!("{:#}", err).contains("no-such-config.json"));
    }

    #[test]
    #[serial]
    fn invalid_json_is_an_error() {
        let path = scratch_file("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = SessionConfig::load(&path).unwrap_err();

        assert!(format!("{:#}", err).contains("parsing config"));
        let _ = fs::remove_file(&path);
    }
}

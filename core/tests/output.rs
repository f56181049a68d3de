//! Structural properties of the generated dataset and CSV.

use chrono::NaiveDate;
use cohort_sample_core::{
    config::GeneratorConfig,
    error::GenError,
    generator::{Dataset, Generator},
    sink,
    validate::check_rows,
};
use std::collections::{HashMap, HashSet};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()
}

fn scratch_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("cohort-sample-{name}-{}", std::process::id()))
}

fn dataset(seed: u64) -> Dataset {
    Generator::new(GeneratorConfig::default().with_seed(seed))
        .unwrap()
        .generate()
        .unwrap()
}

#[test]
fn distinct_users_match_configured_total() {
    let data = dataset(42);
    let users: HashSet<&str> = data.rows.iter().map(|r| r.user_id.as_str()).collect();

    assert_eq!(users.len(), GeneratorConfig::default().total_users());
    assert_eq!(users.len(), data.user_count());
    assert!(users.contains("U0001"));
    assert!(users.contains("U1010"));
}

#[test]
fn each_user_has_exactly_one_signup_row_and_it_is_earliest() {
    for seed in [1, 42, 2024] {
        let data = dataset(seed);
        let mut per_user: HashMap<&str, (usize, NaiveDate, NaiveDate)> = HashMap::new();

        for row in &data.rows {
            let entry = per_user
                .entry(row.user_id.as_str())
                .or_insert((0, row.signup_date, row.event_date));
            if row.is_signup() {
                entry.0 += 1;
            }
            entry.2 = entry.2.min(row.event_date);
        }

        for (user, (signups, signup_date, earliest)) in per_user {
            assert_eq!(signups, 1, "seed {seed}: {user} has {signups} signup rows");
            assert_eq!(earliest, signup_date, "seed {seed}: {user} has an event before signup");
        }
    }
}

#[test]
fn no_event_precedes_its_signup() {
    let data = dataset(7);
    for row in &data.rows {
        assert!(row.event_date >= row.signup_date, "{row:?}");
    }
}

#[test]
fn users_stay_in_their_cohort() {
    let data = dataset(42);
    let starts: HashSet<NaiveDate> = data.cohorts.iter().map(|c| c.start_date).collect();
    for row in &data.rows {
        assert!(starts.contains(&row.signup_date), "{} is not a cohort start", row.signup_date);
    }
}

#[test]
fn rows_are_sorted_and_resorting_is_a_no_op() {
    let data = dataset(42);
    assert!(sink::is_sorted(&data.rows));

    let mut resorted = data.rows.clone();
    sink::sort_rows(&mut resorted);
    assert_eq!(resorted, data.rows);
}

#[test]
fn default_dataset_fits_the_upload_limit() {
    let data = dataset(42);
    let warnings = check_rows(&data.rows, as_of()).unwrap();
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
}

#[test]
fn week_one_retention_is_in_a_plausible_band() {
    // Roughly 60-70% of users should come back in week one across all cohorts.
    let data = dataset(42);
    let week_one: HashSet<&str> = data
        .rows
        .iter()
        .filter(|r| (r.event_date - r.signup_date).num_days() / 7 == 1)
        .map(|r| r.user_id.as_str())
        .collect();
    let share = week_one.len() as f64 / data.user_count() as f64;
    assert!((0.5..0.8).contains(&share), "week-one share {share}");
}

#[test]
fn run_writes_header_and_reports_counts() {
    let dir = scratch_dir("output");
    let path = dir.join("nested").join("sample_cohort_data.csv");
    let config = GeneratorConfig::default().with_output_path(path.clone());

    let report = Generator::new(config).unwrap().run_as_of(as_of()).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();

    assert_eq!(lines.next(), Some("user_id,signup_date,event_date"));
    assert_eq!(lines.count(), report.row_count);
    assert_eq!(report.user_count, 1010);
    assert_eq!(report.cohort_count, 16);
    assert_eq!(report.retention.len(), 16);
    assert_eq!(report.retention[0].active_by_week[0], 65);

    let [first, second] = report.summary_lines();
    assert_eq!(
        first,
        format!("Generated {} rows for 1010 users across 16 cohorts", report.row_count)
    );
    assert!(second.starts_with("Output: "));

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn unwritable_output_path_is_an_error() {
    let dir = scratch_dir("blocked");
    std::fs::create_dir_all(&dir).unwrap();
    // A regular file where a directory is expected.
    let blocker = dir.join("not-a-dir");
    std::fs::write(&blocker, b"x").unwrap();

    let config = GeneratorConfig::default().with_output_path(blocker.join("out.csv"));
    assert!(Generator::new(config).unwrap().run_as_of(as_of()).is_err());

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn reported_output_path_is_canonical() {
    let dir = scratch_dir("canonical");
    let path = dir.join("nested").join("..").join("sample_cohort_data.csv");
    let config = GeneratorConfig::default().with_output_path(path);

    let report = Generator::new(config).unwrap().run_as_of(as_of()).unwrap();

    assert!(report.output_path.is_absolute());
    assert!(
        report.output_path.components().all(|c| c != std::path::Component::ParentDir),
        "{} still has a `..` segment",
        report.output_path.display()
    );
    assert!(report.output_path.ends_with("sample_cohort_data.csv"));

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn oversized_dataset_is_rejected_before_writing() {
    let dir = scratch_dir("oversized");
    let path = dir.join("sample_cohort_data.csv");
    let mut config = GeneratorConfig::default().with_output_path(path.clone());
    config.users_per_cohort = vec![800; 16];

    match Generator::new(config).unwrap().run_as_of(as_of()) {
        Err(GenError::ContractViolation { reason, .. }) => {
            assert!(reason.contains("upload limit"), "{reason}");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(report) => panic!("{} rows were accepted", report.row_count),
    }
    assert!(!path.exists(), "file written despite the violation");

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn future_dated_dataset_is_rejected_before_writing() {
    let dir = scratch_dir("future");
    let path = dir.join("sample_cohort_data.csv");
    let config = GeneratorConfig {
        start_date: NaiveDate::from_ymd_opt(2030, 1, 7).unwrap(),
        ..GeneratorConfig::default().with_output_path(path.clone())
    };

    let result = Generator::new(config).unwrap().run_as_of(as_of());
    assert!(matches!(result, Err(GenError::ContractViolation { .. })));
    assert!(!path.exists(), "file written despite the violation");

    std::fs::remove_dir_all(dir).ok();
}

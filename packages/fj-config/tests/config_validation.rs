use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use fj_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml() -> String {
	SAMPLE_CONFIG_TEMPLATE_TOML.to_string()
}

fn sample_toml_with(section: &[&str], key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let mut table = root.as_table_mut().expect("Template config must be a table.");

	for name in section {
		table = table
			.get_mut(*name)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{name}]."));
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render template config.")
}

fn sample_toml_without(section: &str) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");

	root.as_table_mut().expect("Template config must be a table.").remove(section);

	toml::to_string(&root).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("fj_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn base_config() -> Config {
	toml::from_str(&sample_toml()).expect("Failed to parse test config.")
}

#[test]
fn sample_config_loads() {
	let path = write_temp_config(sample_toml());
	let result = fj_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Expected sample config to load.");

	assert_eq!(cfg.journal.context_limit, 3);
	assert_eq!(cfg.journal.dashboard_limit, 10);
	assert_eq!(cfg.providers.analyzer.model, "gpt-4");
	assert_eq!(cfg.providers.recognizer.languages, vec!["en-US".to_string()]);
}

#[test]
fn journal_and_render_sections_default_when_missing() {
	let payload = sample_toml_without("journal");
	let payload = {
		let mut root: Value = toml::from_str(&payload).expect("Failed to parse config.");

		root.as_table_mut().expect("Config must be a table.").remove("render");

		toml::to_string(&root).expect("Failed to render config.")
	};
	let path = write_temp_config(payload);
	let result = fj_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Expected config without optional sections to load.");

	assert_eq!(cfg.journal.context_limit, 3);
	assert_eq!(cfg.journal.dashboard_limit, 10);
	assert_eq!(cfg.render.scale, 2.0);
	assert_eq!(cfg.render.stroke_width, 3.0);
}

#[test]
fn missing_file_reports_read_error() {
	let mut path = env::temp_dir();

	path.push("fj_config_test_does_not_exist.toml");

	let err = fj_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err}");
}

#[test]
fn malformed_toml_reports_parse_error() {
	let path = write_temp_config("[service\nhttp_bind = ".to_string());
	let result = fj_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let err = result.expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err}");
}

#[test]
fn analyzer_api_key_must_be_non_empty() {
	let payload =
		sample_toml_with(&["providers", "analyzer"], "api_key", Value::String("  ".to_string()));
	let path = write_temp_config(payload);
	let result = fj_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let err = result.expect_err("Expected api_key validation error.");

	assert!(
		err.to_string().contains("Provider analyzer api_key must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn context_limit_must_be_positive() {
	let payload = sample_toml_with(&["journal"], "context_limit", Value::Integer(0));
	let path = write_temp_config(payload);
	let result = fj_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let err = result.expect_err("Expected context_limit validation error.");

	assert!(
		err.to_string().contains("journal.context_limit must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn temperature_must_be_in_range() {
	let mut cfg = base_config();

	cfg.providers.analyzer.temperature = 2.5;

	let err = fj_config::validate(&cfg).expect_err("Expected temperature validation error.");

	assert!(
		err.to_string().contains("providers.analyzer.temperature must be in the range 0.0-2.0."),
		"Unexpected error: {err}"
	);

	cfg.providers.analyzer.temperature = f32::NAN;

	assert!(fj_config::validate(&cfg).is_err());
}

#[test]
fn min_confidence_must_be_a_ratio() {
	let mut cfg = base_config();

	cfg.providers.recognizer.min_confidence = 1.5;

	let err = fj_config::validate(&cfg).expect_err("Expected min_confidence validation error.");

	assert!(
		err.to_string()
			.contains("providers.recognizer.min_confidence must be in the range 0.0-1.0."),
		"Unexpected error: {err}"
	);
}

#[test]
fn acquire_timeout_must_be_positive() {
	let mut cfg = base_config();

	assert_eq!(cfg.storage.postgres.acquire_timeout_ms, 5_000);

	cfg.storage.postgres.acquire_timeout_ms = 0;

	let err = fj_config::validate(&cfg).expect_err("Expected acquire_timeout_ms validation error.");

	assert!(
		err.to_string()
			.contains("storage.postgres.acquire_timeout_ms must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn render_values_must_be_positive() {
	let mut cfg = base_config();

	cfg.render.stroke_width = 0.0;

	let err = fj_config::validate(&cfg).expect_err("Expected render validation error.");

	assert!(
		err.to_string().contains("render.stroke_width must be a finite number greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn blank_languages_fall_back_to_english() {
	let payload = sample_toml_with(
		&["providers", "recognizer"],
		"languages",
		Value::Array(vec![Value::String(" ".to_string())]),
	);
	let path = write_temp_config(payload);
	let result = fj_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Expected config to load.");

	assert_eq!(cfg.providers.recognizer.languages, vec!["en-US".to_string()]);
}

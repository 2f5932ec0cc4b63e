use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub journal: Journal,
	#[serde(default)]
	pub render: Render,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	#[serde(default = "default_acquire_timeout_ms")]
	pub acquire_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub recognizer: RecognizerProviderConfig,
	pub analyzer: LlmProviderConfig,
	pub identity: IdentityProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct RecognizerProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	#[serde(default = "default_languages")]
	pub languages: Vec<String>,
	/// Lines reported below this confidence are discarded before joining.
	#[serde(default)]
	pub min_confidence: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	#[serde(default = "default_llm_model")]
	pub model: String,
	#[serde(default = "default_temperature")]
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct IdentityProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Journal {
	/// Number of past entries compiled into the analysis prompt.
	#[serde(default = "default_context_limit")]
	pub context_limit: u32,
	#[serde(default = "default_dashboard_limit")]
	pub dashboard_limit: u32,
}
impl Default for Journal {
	fn default() -> Self {
		Self { context_limit: default_context_limit(), dashboard_limit: default_dashboard_limit() }
	}
}

#[derive(Debug, Deserialize)]
pub struct Render {
	/// Pixels per canvas point.
	#[serde(default = "default_render_scale")]
	pub scale: f32,
	/// Stroke width in points, used when a stroke carries none.
	#[serde(default = "default_stroke_width")]
	pub stroke_width: f32,
}
impl Default for Render {
	fn default() -> Self {
		Self { scale: default_render_scale(), stroke_width: default_stroke_width() }
	}
}

fn default_acquire_timeout_ms() -> u64 {
	5_000
}

fn default_languages() -> Vec<String> {
	vec!["en-US".to_string()]
}

fn default_llm_model() -> String {
	"gpt-4".to_string()
}

fn default_temperature() -> f32 {
	0.4
}

fn default_context_limit() -> u32 {
	3
}

fn default_dashboard_limit() -> u32 {
	10
}

fn default_render_scale() -> f32 {
	2.0
}

fn default_stroke_width() -> f32 {
	3.0
}

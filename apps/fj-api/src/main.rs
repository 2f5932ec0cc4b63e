use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = fj_api::Args::parse();

	fj_api::run(args).await
}

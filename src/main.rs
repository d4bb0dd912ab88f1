use std::{env, fs, path::Path};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use worldgdp::{config::Config, countries, render};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,worldgdp=info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();
    info!("startup");

    // ─── 2) load config ──────────────────────────────────────────────
    let config_path = env::args().nth(1).unwrap_or_else(|| "worldgdp.yaml".to_string());
    let config = Config::load(Path::new(&config_path))?;
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("creating output dir {}", config.out_dir.display()))?;

    // ─── 3) render one map per year ──────────────────────────────────
    let plot_countries = countries::plot_countries();
    info!(
        countries = plot_countries.len(),
        years = config.years.len(),
        "rendering world maps"
    );

    for year in &config.years {
        let out_path = config.out_dir.join(format!("world_gdp_{}.svg", year));
        render::render_world_map(&config.gdp, &config.codes, &plot_countries, year, &out_path)
            .with_context(|| format!("rendering map for {}", year))?;
    }

    info!("done");
    Ok(())
}

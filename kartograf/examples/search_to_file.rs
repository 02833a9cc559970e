//! This example shows how to drive the viewer without any UI: it searches for an address and
//! saves the resulting map image to a file.
//!
//! Api keys are taken from `KARTOGRAF_GEOCODER_KEY` and `KARTOGRAF_SEARCH_KEY` environment
//! variables. Running it will create a file `output_map.png`.
//!
//! ```shell
//! KARTOGRAF_GEOCODER_KEY=... cargo run --example search_to_file -- "Red Square, Moscow"
//! ```

use std::sync::Arc;

use anyhow::{anyhow, Result};
use kartograf::platform::NativeHttpService;
use kartograf::{Layout, ViewController, ViewerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let query = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("This example must be run with one argument - address to find"))?;

    let config = ViewerConfig::default()
        .with_env_overrides()
        .with_initial_layout(Layout::Hybrid);
    let controller = ViewController::new(config, Arc::new(NativeHttpService::new()?))?;

    controller.search_text(&query).await;
    controller.zoom_in().await;

    let state = controller.state();
    log::info!(
        "View at {} zoom {}: {}",
        state.center(),
        state.zoom(),
        controller.address_label().unwrap_or_default()
    );

    let image = controller
        .image()
        .ok_or_else(|| anyhow!("Map image was not loaded"))?;
    std::fs::write("output_map.png", &image)?;

    Ok(())
}

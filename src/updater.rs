//! Periodic sampling loop
//!
//! One cycle samples every metric in a fixed order and commits the rendered
//! fragment on success. Each source+render invocation is guarded on its own:
//! a failed metric keeps its previous cached fragment and the rest of the
//! cycle proceeds. The next cycle starts a fixed pause after the previous
//! one finished, so long samples push the schedule back instead of piling
//! up.

use chrono::Local;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::SharedCache;
use crate::config::Config;
use crate::{metrics, render};

/// Run the update loop forever. Only an error escaping a whole cycle ends
/// this future; the caller treats that as fatal.
pub async fn run(cache: SharedCache, config: Config) -> anyhow::Result<()> {
    let pause = Duration::from_millis(config.tick_interval_ms);

    loop {
        run_cycle(&cache, &config).await;
        tokio::time::sleep(pause).await;
    }
}

/// One full sampling pass. Order is fixed: temperature, cpu, ram, clock,
/// battery, hostname.
async fn run_cycle(cache: &SharedCache, config: &Config) {
    match metrics::temperature(&config.sensors_cmd).await {
        Ok(degrees) => cache.commit(|f| f.temperature = render::temperature(degrees)),
        Err(e) => warn!("temperature sample failed: {e}"),
    }

    match metrics::cpu(&config.proc_stat_path).await {
        Ok(percent) => cache.commit(|f| f.cpu = render::cpu(percent)),
        Err(e) => warn!("cpu sample failed: {e}"),
    }

    match metrics::ram(&config.free_cmd).await {
        Ok(percent) => cache.commit(|f| f.ram = render::ram(percent)),
        Err(e) => warn!("ram sample failed: {e}"),
    }

    cache.commit(|f| f.clock = render::clock(Local::now()));

    if cache.has_battery() {
        match metrics::battery(&config.battery_dir()).await {
            Ok(reading) => cache.commit(|f| f.battery = render::battery(&reading)),
            Err(e) => warn!("battery sample failed: {e}"),
        }
    }

    match metrics::hostname(&config.hostname_cmd).await {
        Ok(name) => cache.commit(|f| f.hostname = render::hostname(&name)),
        Err(e) => warn!("hostname sample failed: {e}"),
    }

    debug!("update cycle committed");
}

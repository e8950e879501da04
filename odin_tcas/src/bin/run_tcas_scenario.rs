/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use odin_tcas::{load_config, scenario::load_scenario, scenario::run_scenario, TcasConfig, TcasEvent};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "run a straight line traffic scenario through the TCAS core and log its events")]
pub struct Args {
    /// TCAS config file (RON), default config if not set
    #[arg(short,long)]
    pub config: Option<String>,

    /// print final summary as RON
    #[arg(short,long)]
    pub summary: bool,

    /// scenario file (RON)
    pub scenario: String,
}

fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config( path)?,
        None => TcasConfig::default()
    };
    let scenario = load_scenario( &args.scenario)?;

    let summary = run_scenario( &scenario, config, |e: &TcasEvent| {
        match e {
            TcasEvent::RaIssued(ra) => info!("RA issued: {ra}"),
            TcasEvent::RaUpdated(ra) => info!("RA updated: {ra}"),
            TcasEvent::RaCanceled => info!("RA canceled"),
            TcasEvent::AlertLevelChanged { id, previous, current } => info!("{id}: {previous} -> {current}"),
            TcasEvent::AlertCountsChanged(c) => info!("counts PA:{} TA:{} RA:{}", c.proximity, c.traffic, c.resolution),
            TcasEvent::OperatingModeChanged(mode) => info!("mode: {mode}"),
        }
    })?;

    if args.summary {
        println!("{}", ron::ser::to_string_pretty( &summary, ron::ser::PrettyConfig::default())?);
    }

    Ok(())
}

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

use std::{fs, path::Path};
use serde::{Serialize,Deserialize};

use crate::errors::{op_failed, Result};
use crate::policy::OperatingMode;
use crate::sensitivity::{SensitivityLevelSpec, default_sensitivity_levels};

/// top level TCAS configuration. Values that are not specified in the RON source use their defaults
#[derive(Deserialize,Serialize,Debug,Clone)]
#[serde(default)]
pub struct TcasConfig {
    pub initial_mode: OperatingMode,

    pub max_real_update_freq: f64, // [Hz] max wall clock update frequency, <= 0 means no limit
    pub max_sim_update_freq: f64,  // [Hz] max simulation time update frequency, <= 0 means no limit

    pub max_intruder_count: usize, // max number of intruders we evaluate per cycle
    pub min_ground_speed_kn: f64,  // below which intruder data is considered to be insufficient

    pub ra: RaConfig,

    pub sensitivity_levels: Vec<SensitivityLevelSpec>,
}

impl Default for TcasConfig {
    fn default()->Self {
        TcasConfig {
            initial_mode: OperatingMode::TrafficAndResolution,
            max_real_update_freq: 10.0,
            max_sim_update_freq: 2.0,
            max_intruder_count: 30,
            min_ground_speed_kn: 30.0,
            ra: RaConfig::default(),
            sensitivity_levels: default_sensitivity_levels(),
        }
    }
}

impl TcasConfig {
    pub fn check (&self)->Result<()> {
        if self.max_intruder_count == 0 { return Err( op_failed!("max_intruder_count has to be > 0")) }
        if self.sensitivity_levels.is_empty() { return Err( op_failed!("no sensitivity levels")) }
        self.ra.check()
    }
}

/// resolution advisory vertical speed envelope and pilot response model
#[derive(Deserialize,Serialize,Debug,Clone)]
#[serde(default)]
pub struct RaConfig {
    pub climb_fpm: f64,      // fixed climb/descend magnitude
    pub increase_fpm: f64,   // increase climb/descend magnitude
    pub vsl_step_fpm: f64,   // vertical speed limit quantization
    pub vsl_max_fpm: f64,    // max vertical speed limit magnitude

    pub initial_response_secs: f64,
    pub initial_accel_g: f64,
    pub subsequent_response_secs: f64,
    pub subsequent_accel_g: f64,

    pub descend_inhibit_radar_alt_ft: Option<f64>,
    pub increase_descend_inhibit_radar_alt_ft: Option<f64>,
}

impl Default for RaConfig {
    fn default()->Self {
        RaConfig {
            climb_fpm: 1500.0,
            increase_fpm: 2500.0,
            vsl_step_fpm: 500.0,
            vsl_max_fpm: 2000.0,
            initial_response_secs: 5.0,
            initial_accel_g: 0.25,
            subsequent_response_secs: 2.5,
            subsequent_accel_g: 0.35,
            descend_inhibit_radar_alt_ft: Some(1100.0),
            increase_descend_inhibit_radar_alt_ft: Some(1550.0),
        }
    }
}

impl RaConfig {
    pub fn check (&self)->Result<()> {
        if !(self.climb_fpm > 0.0 && self.increase_fpm >= self.climb_fpm) {
            return Err( op_failed!("invalid climb/increase rates: {} / {}", self.climb_fpm, self.increase_fpm))
        }
        if !(self.vsl_step_fpm > 0.0 && self.vsl_max_fpm >= self.vsl_step_fpm) {
            return Err( op_failed!("invalid vertical speed limits: {} / {}", self.vsl_step_fpm, self.vsl_max_fpm))
        }
        if !(self.initial_accel_g > 0.0 && self.subsequent_accel_g > 0.0) {
            return Err( op_failed!("response accelerations have to be positive"))
        }
        if !(self.initial_response_secs >= 0.0 && self.subsequent_response_secs >= 0.0) {
            return Err( op_failed!("response times cannot be negative"))
        }
        Ok(())
    }
}

pub fn parse_config (src: &str)->Result<TcasConfig> {
    let config: TcasConfig = ron::de::from_str( src)?;
    config.check()?;
    Ok(config)
}

pub fn load_config<P: AsRef<Path>> (path: P)->Result<TcasConfig> {
    let src = fs::read_to_string( path)?;
    parse_config( &src)
}

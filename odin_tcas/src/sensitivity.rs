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

//! altitude dependent TCAS sensitivity levels

use serde::{Serialize,Deserialize};

use crate::tca::ZoneParameters;
use crate::units::{ft_to_m, nm_to_m};

/// one row of the sensitivity level table in configuration units. NaN values mean "not applicable"
/// (e.g. there are no resolution advisories in SL2, and SL4+ are not selected by radar altitude)
#[derive(Debug,Clone,Serialize,Deserialize,PartialEq)]
pub struct SensitivityLevelSpec {
    pub level: u8,

    pub max_radar_alt_ft: f64,
    pub max_alt_ft: f64,

    pub pa_radius_nm: f64,
    pub pa_half_height_ft: f64,

    pub ta_lookahead_secs: f64,
    pub ta_radius_nm: f64,
    pub ta_half_height_ft: f64,

    pub ra_lookahead_secs: f64,
    pub ra_radius_nm: f64,
    pub ra_half_height_ft: f64,
    pub alim_ft: f64,
}

impl SensitivityLevelSpec {
    #[allow(clippy::too_many_arguments)]
    const fn new (level: u8, max_radar_alt_ft: f64, max_alt_ft: f64,
                  ta_lookahead_secs: f64, ta_radius_nm: f64, ta_half_height_ft: f64,
                  ra_lookahead_secs: f64, ra_radius_nm: f64, ra_half_height_ft: f64, alim_ft: f64)->Self {
        SensitivityLevelSpec {
            level, max_radar_alt_ft, max_alt_ft,
            pa_radius_nm: 6.0, pa_half_height_ft: 1200.0,
            ta_lookahead_secs, ta_radius_nm, ta_half_height_ft,
            ra_lookahead_secs, ra_radius_nm, ra_half_height_ft, alim_ft
        }
    }

    /// does this level apply for given altitude and radar altitude (both in ft, radar altitude can be NaN)
    pub fn applies_to (&self, alt_ft: f64, radar_alt_ft: f64)->bool {
        (self.max_radar_alt_ft.is_finite() && radar_alt_ft < self.max_radar_alt_ft)
        || (!self.max_alt_ft.is_nan() && alt_ft < self.max_alt_ft)
    }

    /// convert into the SI parameters used by predictions
    pub fn to_sensitivity (&self, index: usize)->Sensitivity {
        Sensitivity {
            index,
            level: self.level,
            proximity: ZoneParameters::new( 0.0, nm_to_m( self.pa_radius_nm), ft_to_m( self.pa_half_height_ft)),
            traffic: ZoneParameters::new( self.ta_lookahead_secs, nm_to_m( self.ta_radius_nm), ft_to_m( self.ta_half_height_ft)),
            resolution: ZoneParameters::new( self.ra_lookahead_secs, nm_to_m( self.ra_radius_nm), ft_to_m( self.ra_half_height_ft)),
            alim: ft_to_m( self.alim_ft),
        }
    }
}

const NA: f64 = f64::NAN;

/// the standard TCAS II sensitivity levels, ordered by increasing altitude
pub const DEFAULT_SENSITIVITY_LEVELS: [SensitivityLevelSpec;7] = [
    //                          SL  radar   alt         TA:tau dmod  zthr    RA:tau dmod  zthr   alim
    SensitivityLevelSpec::new(  2, 1000.0, NA,             20.0, 0.30, 850.0,    NA,  NA,   NA,    NA),
    SensitivityLevelSpec::new(  3, 2350.0, NA,             25.0, 0.33, 850.0,  15.0, 0.20, 600.0, 300.0),
    SensitivityLevelSpec::new(  4, NA,     5000.0,         30.0, 0.48, 850.0,  20.0, 0.35, 600.0, 300.0),
    SensitivityLevelSpec::new(  5, NA,     10000.0,        40.0, 0.75, 850.0,  25.0, 0.55, 600.0, 350.0),
    SensitivityLevelSpec::new(  6, NA,     20000.0,        45.0, 1.00, 850.0,  30.0, 0.80, 600.0, 400.0),
    SensitivityLevelSpec::new(  7, NA,     42000.0,        48.0, 1.30, 850.0,  35.0, 1.10, 700.0, 600.0),
    SensitivityLevelSpec::new(  7, NA,     f64::INFINITY,  48.0, 1.30, 1200.0, 35.0, 1.10, 800.0, 700.0),
];

pub fn default_sensitivity_levels ()->Vec<SensitivityLevelSpec> {
    DEFAULT_SENSITIVITY_LEVELS.to_vec()
}

/// the sensitivity parameters for the current cycle (SI units)
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct Sensitivity {
    pub index: usize, // into the level table
    pub level: u8,    // nominal sensitivity level (SL)
    pub proximity: ZoneParameters,
    pub traffic: ZoneParameters,
    pub resolution: ZoneParameters,
    pub alim: f64, // m
}

impl Sensitivity {
    pub fn has_resolution (&self)->bool {
        self.resolution.is_defined() && self.alim.is_finite()
    }
}

/// maps own (indicated) altitude and radar altitude to a sensitivity level. The level table is injected at
/// construction, it is not changed afterwards
#[derive(Debug)]
pub struct SensitivityProvider {
    levels: Vec<SensitivityLevelSpec>,
    current: Sensitivity,
}

impl SensitivityProvider {
    pub fn new (levels: Vec<SensitivityLevelSpec>)->Self {
        assert!( !levels.is_empty(), "empty sensitivity level table");
        let current = levels[0].to_sensitivity(0);
        SensitivityProvider { levels, current }
    }

    pub fn levels (&self)->&[SensitivityLevelSpec] { self.levels.as_slice() }

    /// index of the first level that applies. If none applies we use the last (highest) level.
    /// On ground we always use the first level
    pub fn level_index (&self, alt: f64, radar_alt: f64, on_ground: bool)->usize {
        if on_ground { return 0 }

        let alt_ft = crate::units::m_to_ft( alt);
        let radar_alt_ft = crate::units::m_to_ft( radar_alt);
        self.levels.iter()
            .position( |l| l.applies_to( alt_ft, radar_alt_ft))
            .unwrap_or( self.levels.len() - 1)
    }

    /// recompute the current sensitivity from altitude and radar altitude (both in meters, radar altitude is NaN
    /// if not available)
    pub fn update (&mut self, alt: f64, radar_alt: f64, on_ground: bool)->&Sensitivity {
        let idx = self.level_index( alt, radar_alt, on_ground);
        if idx != self.current.index {
            self.current = self.levels[idx].to_sensitivity(idx);
        }
        &self.current
    }

    pub fn current (&self)->&Sensitivity { &self.current }
}

impl Default for SensitivityProvider {
    fn default()->Self { SensitivityProvider::new( default_sensitivity_levels()) }
}

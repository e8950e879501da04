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

//! operating mode and the policy hooks that decide if advisories can be issued or canceled, and
//! which resolution advisory options are available. The geometric core never changes with policy -
//! inhibit windows and the like are added by implementing [`TcasPolicy`].

use std::fmt;
use serde::{Serialize,Deserialize};

use crate::config::RaConfig;
use crate::intruder::Intruder;
use crate::own_vehicle::OwnVehicleTracker;
use crate::resolution::sense::Sense;
use crate::units::ft_to_m;

/// the global operating mode, set by an external authority (e.g. a transponder control panel)
#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize)]
pub enum OperatingMode {
    Standby,
    TrafficOnly,
    #[default]
    TrafficAndResolution,
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatingMode::Standby => write!(f, "STBY"),
            OperatingMode::TrafficOnly => write!(f, "TA ONLY"),
            OperatingMode::TrafficAndResolution => write!(f, "TA/RA"),
        }
    }
}

/// capability set of issue/cancel predicates and resolution advisory options.
/// All methods have defaults so that impls only have to override what they restrict.
pub trait TcasPolicy {
    fn can_issue_ta (&self, _intruder: &Intruder)->bool { true }
    fn can_cancel_ta (&self, _intruder: &Intruder)->bool { true }

    /// by default we need the mode to permit RAs and the closest approach must not be in the past
    fn can_issue_ra (&self, intruder: &Intruder, mode: OperatingMode)->bool {
        mode == OperatingMode::TrafficAndResolution && intruder.ra_prediction().tca() >= 0.0
    }
    fn can_cancel_ra (&self, _intruder: &Intruder)->bool { true }

    fn can_cancel_pa (&self, _intruder: &Intruder)->bool { true }

    //--- resolution advisory options

    fn allow_climb (&self, _own: &OwnVehicleTracker)->bool { true }
    fn allow_descend (&self, _own: &OwnVehicleTracker)->bool { true }
    fn allow_increase_climb (&self, _own: &OwnVehicleTracker)->bool { true }
    fn allow_increase_descend (&self, _own: &OwnVehicleTracker)->bool { true }
    fn allow_reversal (&self, _own: &OwnVehicleTracker)->bool { true }
}

pub fn allows_sense<P> (policy: &P, sense: Sense, own: &OwnVehicleTracker)->bool where P: TcasPolicy + ?Sized {
    match sense {
        Sense::Up => policy.allow_climb( own),
        Sense::Down => policy.allow_descend( own),
    }
}

pub fn allows_increase<P> (policy: &P, sense: Sense, own: &OwnVehicleTracker)->bool where P: TcasPolicy + ?Sized {
    match sense {
        Sense::Up => policy.allow_increase_climb( own),
        Sense::Down => policy.allow_increase_descend( own),
    }
}

/// the standard policy: everything allowed except for descend advisories close to the ground
#[derive(Debug,Clone)]
pub struct DefaultTcasPolicy {
    descend_inhibit_radar_alt: f64, // m, NaN if not inhibited
    increase_descend_inhibit_radar_alt: f64, // m, NaN if not inhibited
}

impl DefaultTcasPolicy {
    pub fn new (ra_config: &RaConfig)->Self {
        DefaultTcasPolicy {
            descend_inhibit_radar_alt: ra_config.descend_inhibit_radar_alt_ft.map( ft_to_m).unwrap_or(f64::NAN),
            increase_descend_inhibit_radar_alt: ra_config.increase_descend_inhibit_radar_alt_ft.map( ft_to_m).unwrap_or(f64::NAN),
        }
    }

    /// a policy without any low altitude inhibitions
    pub fn permissive ()->Self {
        DefaultTcasPolicy { descend_inhibit_radar_alt: f64::NAN, increase_descend_inhibit_radar_alt: f64::NAN }
    }
}

impl Default for DefaultTcasPolicy {
    fn default()->Self { DefaultTcasPolicy::new( &RaConfig::default()) }
}

impl TcasPolicy for DefaultTcasPolicy {
    // note that NaN thresholds or radar altitudes never inhibit
    fn allow_descend (&self, own: &OwnVehicleTracker)->bool {
        !(own.on_ground() || own.radar_altitude() < self.descend_inhibit_radar_alt)
    }

    fn allow_increase_descend (&self, own: &OwnVehicleTracker)->bool {
        !(own.on_ground() || own.radar_altitude() < self.increase_descend_inhibit_radar_alt)
    }
}

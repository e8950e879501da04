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

//! the per-intruder alert level state machine

use std::fmt;
use serde::{Serialize,Deserialize};

use crate::intruder::Intruder;
use crate::policy::{OperatingMode, TcasPolicy};
use crate::sensitivity::Sensitivity;

/// advisory class of an intruder, ordered by increasing severity
#[derive(Debug,Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Hash,Default,Serialize,Deserialize)]
pub enum AlertLevel {
    #[default]
    None,
    Proximity,
    Traffic,
    Resolution,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertLevel::None => write!(f, "-"),
            AlertLevel::Proximity => write!(f, "PA"),
            AlertLevel::Traffic => write!(f, "TA"),
            AlertLevel::Resolution => write!(f, "RA"),
        }
    }
}

/// compute the next alert level of `intruder` from its current level and its (already updated) predictions.
///
/// Levels are checked in order of decreasing severity. A level is entered if its prediction is inside of the
/// protected zone and the policy allows issuing it, and an intruder at a given level only leaves it if the policy
/// allows to cancel it. Transitions can skip levels in both directions.
pub fn next_alert_level<P> (intruder: &Intruder, sensitivity: &Sensitivity, mode: OperatingMode, policy: &P)->AlertLevel
    where P: TcasPolicy + ?Sized
{
    let current = intruder.alert_level();

    if intruder.ra_prediction().is_inside() && policy.can_issue_ra( intruder, mode) {
        return AlertLevel::Resolution
    }
    if current == AlertLevel::Resolution && !policy.can_cancel_ra( intruder) {
        return AlertLevel::Resolution
    }

    if intruder.ta_prediction().is_inside() && policy.can_issue_ta( intruder) {
        return AlertLevel::Traffic
    }
    if current == AlertLevel::Traffic && !policy.can_cancel_ta( intruder) {
        return AlertLevel::Traffic
    }

    // proximity is based on the current separation, not on the TCA prediction
    if intruder.is_valid() && sensitivity.proximity.is_defined()
        && sensitivity.proximity.contains( intruder.relative_position()) {
        return AlertLevel::Proximity
    }
    if current == AlertLevel::Proximity && !policy.can_cancel_pa( intruder) {
        return AlertLevel::Proximity
    }

    AlertLevel::None
}

/// per cycle alert statistics
#[derive(Debug,Clone,Copy,Default,PartialEq,Eq,Serialize,Deserialize)]
pub struct AlertCounts {
    pub proximity: usize,
    pub traffic: usize,
    pub resolution: usize,
}

impl AlertCounts {
    pub fn add (&mut self, level: AlertLevel) {
        match level {
            AlertLevel::None => {}
            AlertLevel::Proximity => self.proximity += 1,
            AlertLevel::Traffic => self.traffic += 1,
            AlertLevel::Resolution => self.resolution += 1,
        }
    }
}

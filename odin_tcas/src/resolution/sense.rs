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

//! vertical maneuver kinematics and advisory sense selection.
//!
//! The response model assumes the own vehicle keeps its current vertical speed `v0` for the response time
//! and then accelerates with constant acceleration towards the target vertical speed, which it holds
//! afterwards. All values are SI (m, s, m/s, m/s²).

use std::fmt;
use serde::{Serialize,Deserialize};

use crate::config::RaConfig;
use crate::units::{fpm_to_mps, g_to_mps2};

const VS_EPS: f64 = 1e-6;     // [m/s] numerical slack for target comparisons
const ALT_EPS: f64 = 0.01;    // [m] numerical slack for altitude comparisons

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum Sense {
    Up,
    Down,
}

impl Sense {
    #[inline]
    pub fn sign (&self)->f64 {
        match self { Sense::Up => 1.0, Sense::Down => -1.0 }
    }

    pub fn opposite (&self)->Sense {
        match self { Sense::Up => Sense::Down, Sense::Down => Sense::Up }
    }
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Sense::Up => write!(f, "UP"), Sense::Down => write!(f, "DOWN") }
    }
}

/// assumed pilot response
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct ResponseModel {
    pub response_time: f64, // s
    pub acceleration: f64,  // m/s²
}

impl ResponseModel {
    pub fn new (response_time: f64, acceleration: f64)->Self {
        ResponseModel { response_time, acceleration }
    }

    pub fn initial (config: &RaConfig)->Self {
        ResponseModel::new( config.initial_response_secs, g_to_mps2( config.initial_accel_g))
    }

    pub fn subsequent (config: &RaConfig)->Self {
        ResponseModel::new( config.subsequent_response_secs, g_to_mps2( config.subsequent_accel_g))
    }
}

/// altitude change after `t` seconds when starting with vertical speed `v0` and maneuvering towards `vt`
pub fn altitude_change (v0: f64, vt: f64, t: f64, model: &ResponseModel)->f64 {
    let tr = t - model.response_time;
    if tr <= 0.0 {
        v0 * t
    } else {
        let dv = vt - v0;
        let s = dv.signum();
        let t_acc = dv.abs() / model.acceleration;

        if t_acc >= tr { // still accelerating at `t`
            v0 * t + s * model.acceleration * tr * tr / 2.0
        } else {
            v0 * t + s * model.acceleration * (t_acc * tr - t_acc * t_acc / 2.0)
        }
    }
}

/// the target vertical speed that results in an altitude change of exactly `dz` after `t` seconds.
///
/// With `T = t - response_time` and `D = dz - v0·t` the acceleration phase duration `t_a` has to satisfy
/// `t_a² - 2·T·t_a + 2·|D|/a = 0`, of which we need the root within `[0,T]`. Returns `None` if there is no
/// real root (the altitude change cannot be achieved at all) or if `t` is within the response time and the
/// current vertical speed does not already achieve `dz`
pub fn required_vertical_speed (dz: f64, t: f64, v0: f64, model: &ResponseModel)->Option<f64> {
    if !(t.is_finite() && dz.is_finite() && v0.is_finite()) || t < 0.0 {
        return None
    }

    let tr = t - model.response_time;
    let d = dz - v0 * t;

    if d.abs() < ALT_EPS {
        return Some(v0)
    }
    if tr <= 0.0 {
        return None
    }

    let disc = tr * tr - 2.0 * d.abs() / model.acceleration;
    if disc < 0.0 {
        return None
    }

    let t_acc = tr - disc.sqrt();
    if t_acc < 0.0 || t_acc > tr {
        return None
    }

    Some( v0 + d.signum() * model.acceleration * t_acc)
}

/// the discrete vertical speed values advisories can command (all magnitudes in m/s)
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct VsEnvelope {
    pub climb: f64,
    pub increase: f64,
    pub vsl_step: f64,
    pub vsl_max: f64,
}

impl VsEnvelope {
    pub fn new (config: &RaConfig)->Self {
        VsEnvelope {
            climb: fpm_to_mps( config.climb_fpm),
            increase: fpm_to_mps( config.increase_fpm),
            vsl_step: fpm_to_mps( config.vsl_step_fpm),
            vsl_max: fpm_to_mps( config.vsl_max_fpm),
        }
    }

    /// map a required vertical speed `vt` to the discrete advisory target of `sense`. Requirements against the
    /// sense become vertical speed limits (rounded towards the sense in `vsl_step` increments), requirements
    /// in sense direction the fixed climb (or increase) magnitude
    pub fn quantize (&self, sense: Sense, vt: f64, allow_increase: bool)->f64 {
        let u = sense.sign() * vt;

        let q = if u <= VS_EPS {
            let vsl = (u / self.vsl_step - VS_EPS).ceil() * self.vsl_step;
            vsl.max( -self.vsl_max) + 0.0 // no negative zeros
        } else if u <= self.climb + VS_EPS || !allow_increase {
            self.climb
        } else {
            self.increase
        };

        sense.sign() * q
    }

    /// the vertical speed limit of `sense` closest to `v` that `v` already complies with
    pub fn complying_limit (&self, sense: Sense, v: f64)->f64 {
        let u = sense.sign() * v;
        let vsl = ((u / self.vsl_step + VS_EPS).floor() * self.vsl_step).clamp( -self.vsl_max, 0.0);
        sense.sign() * vsl + 0.0
    }

    /// is `target` a vertical speed limit (i.e. does not command to climb/descend in sense direction)
    pub fn is_limit (&self, sense: Sense, target: f64)->bool {
        sense.sign() * target <= VS_EPS
    }

    pub fn is_increase (&self, sense: Sense, target: f64)->bool {
        sense.sign() * target >= self.increase - VS_EPS
    }
}

/// the geometry sense selection is based on
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct SenseInput {
    pub tca: f64,                      // s
    pub alim: f64,                     // m
    pub own_altitude: f64,             // m
    pub own_vertical_speed: f64,       // m/s
    pub own_altitude_at_tca: f64,      // m, linear prediction
    pub intruder_altitude_at_tca: f64, // m, linear prediction
}

impl SenseInput {
    /// the own altitude we need at TCA for the given sense
    pub fn target_altitude (&self, sense: Sense)->f64 {
        self.intruder_altitude_at_tca + sense.sign() * self.alim
    }

    /// does `sense` require to pass through the predicted intruder altitude
    pub fn is_crossing (&self, sense: Sense)->bool {
        match sense {
            Sense::Up => self.own_altitude < self.intruder_altitude_at_tca,
            Sense::Down => self.own_altitude > self.intruder_altitude_at_tca,
        }
    }

    /// the sense that does not cross the intruder altitude
    pub fn non_crossing_sense (&self)->Sense {
        if self.own_altitude >= self.intruder_altitude_at_tca { Sense::Up } else { Sense::Down }
    }

    /// does a maneuver towards `target_vs` reach the target altitude of `sense` at TCA
    pub fn reaches_target (&self, sense: Sense, target_vs: f64, model: &ResponseModel)->bool {
        let dz = self.target_altitude( sense) - self.own_altitude;
        let achieved = altitude_change( self.own_vertical_speed, target_vs, self.tca, model);
        sense.sign() * (achieved - dz) >= -ALT_EPS
    }
}

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct SenseSolution {
    pub sense: Sense,
    pub target_vs: f64,   // quantized advisory target (m/s)
    pub required_vs: f64, // exact requirement, NaN if not solvable
    pub reaches_target: bool,
    pub crossing: bool,
}

impl SenseSolution {
    /// the vertical speed change needed to comply with the target bound, 0 if we already comply
    pub fn vs_change (&self, v0: f64)->f64 {
        (self.sense.sign() * (self.target_vs - v0)).max(0.0)
    }
}

/// compute the (quantized) target vertical speed for `sense`
pub fn evaluate_sense (input: &SenseInput, sense: Sense, model: &ResponseModel, envelope: &VsEnvelope, allow_increase: bool)->SenseSolution {
    let dz = input.target_altitude( sense) - input.own_altitude;

    let (required_vs, target_vs) = match required_vertical_speed( dz, input.tca, input.own_vertical_speed, model) {
        Some(vt) => (vt, envelope.quantize( sense, vt, allow_increase)),
        None => {
            let limit = envelope.complying_limit( sense, input.own_vertical_speed);
            if input.reaches_target( sense, limit, model) { // already beyond the target altitude
                (f64::NAN, limit)
            } else { // use the strongest target we have, which still might not be enough
                let vmax = if allow_increase { envelope.increase } else { envelope.climb };
                (f64::NAN, sense.sign() * vmax)
            }
        }
    };

    SenseSolution {
        sense,
        target_vs,
        required_vs,
        reaches_target: input.reaches_target( sense, target_vs, model),
        crossing: input.is_crossing( sense),
    }
}

/// select the advisory sense and target vertical speed.
///
/// Candidates have to be allowed and reach their target altitude at TCA with the climb magnitude. Among those we
/// prefer non-crossing senses, then the one that requires the smaller vertical speed change. If no sense qualifies we
/// fall back to a preventive zero target in the non-crossing sense, which does not reach the target altitude.
/// `only` restricts the selection to a single sense (used for reversals).
///
/// A non-positive or undefined ALIM is a programming error and panics.
pub fn select_sense<F> (input: &SenseInput, model: &ResponseModel, envelope: &VsEnvelope, allowed: F, only: Option<Sense>)->SenseSolution
    where F: Fn(Sense)->bool
{
    assert!( input.alim.is_finite() && input.alim > 0.0, "invalid ALIM {}", input.alim);

    let mut best: Option<SenseSolution> = None;

    for sense in [Sense::Up, Sense::Down] {
        if only.is_some_and( |s| s != sense) || !allowed(sense) { continue }

        let sol = evaluate_sense( input, sense, model, envelope, false);
        if sol.reaches_target {
            best = match best {
                Some(b) if !is_preferred( &sol, &b, input) => Some(b),
                _ => Some(sol)
            }
        }
    }

    best.unwrap_or_else( || {
        let sense = only.unwrap_or_else( || input.non_crossing_sense());
        SenseSolution {
            sense,
            target_vs: 0.0,
            required_vs: f64::NAN,
            reaches_target: false,
            crossing: input.is_crossing( sense),
        }
    })
}

// is `a` preferable over `b`
fn is_preferred (a: &SenseSolution, b: &SenseSolution, input: &SenseInput)->bool {
    if a.crossing != b.crossing {
        return !a.crossing
    }

    let va = a.vs_change( input.own_vertical_speed);
    let vb = b.vs_change( input.own_vertical_speed);
    if (va - vb).abs() > VS_EPS {
        va < vb
    } else { // tie - go away from where we are heading relative to the intruder
        let predicted = if input.own_altitude_at_tca >= input.intruder_altitude_at_tca { Sense::Up } else { Sense::Down };
        a.sense == predicted && b.sense != predicted
    }
}

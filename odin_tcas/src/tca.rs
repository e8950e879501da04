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

//! time of closest approach (TCA) prediction.
//!
//! The separation measure is the cylindrical norm `N(t) = max( |s_z(t)|/h, |s_xy(t)|/r )` of the linearly
//! extrapolated relative position `s(t) = s + v·t`, which is <= 1 iff the intruder is inside the protected
//! cylinder of radius `r` and half-height `h`. Both terms are convex in `t`, hence so is `N`, and its minimum
//! within `[0,L]` can only be at
//!   - the horizontal extremum (minimum of `|s_xy(t)|`)
//!   - the vertical extremum (zero crossing of `s_z(t)`)
//!   - a branch switch point where both terms are equal (roots of `a·t² + b·t + c = 0`)
//!   - the interval bounds `0` or `L`
//! We evaluate all of them (clamped to `L`) in this order and keep the first one with the smallest norm.

use crate::cartesian3::Cartesian3;

const EPS_V: f64 = 1e-9;   // [m/s] below which we consider a velocity component to be zero
const EPS_Q: f64 = 1e-15;  // [1/s²] below which we consider the quadratic to be degenerate

/// the protected zone shape and time horizon for one advisory class. Undefined parameters are NaN
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct ZoneParameters {
    pub lookahead: f64,   // s
    pub radius: f64,      // m
    pub half_height: f64, // m
}

impl ZoneParameters {
    pub const fn new (lookahead: f64, radius: f64, half_height: f64)->Self {
        ZoneParameters { lookahead, radius, half_height }
    }

    pub const fn undefined ()->Self {
        ZoneParameters { lookahead: f64::NAN, radius: f64::NAN, half_height: f64::NAN }
    }

    pub fn is_defined (&self)->bool {
        self.lookahead.is_finite() && self.radius.is_finite() && self.half_height.is_finite()
    }

    /// is the given relative position inside of this zone
    pub fn contains (&self, s: &Cartesian3)->bool {
        cylindrical_norm( s, self.radius, self.half_height) <= 1.0
    }
}

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct TcaSolution {
    pub time: f64,
    pub norm: f64,
}

impl TcaSolution {
    pub const UNDEFINED: TcaSolution = TcaSolution { time: f64::NAN, norm: f64::NAN };

    pub fn is_defined (&self)->bool { self.time.is_finite() && self.norm.is_finite() }
}

/// the cylindrical norm of relative position `s`. NaN if any input is NaN
#[inline]
pub fn cylindrical_norm (s: &Cartesian3, radius: f64, half_height: f64)->f64 {
    let nv = s.z.abs() / half_height;
    let nh = s.horizontal_length() / radius;
    if nv.is_nan() || nh.is_nan() { f64::NAN } else { nv.max(nh) }
}

/// compute the time `t* ∈ [0,lookahead]` that minimizes the cylindrical norm of `s + v·t`.
/// 
/// Zero or undefined zone dimensions and undefined vectors return [`TcaSolution::UNDEFINED`].
/// Negative zone dimensions are a programming error and panic.
pub fn solve_tca (s: &Cartesian3, v: &Cartesian3, radius: f64, half_height: f64, lookahead: f64)->TcaSolution {
    assert!( !(radius < 0.0) && !(half_height < 0.0), "negative protected zone dimensions (r={radius}, h={half_height})");

    if !(radius > 0.0 && half_height > 0.0 && lookahead >= 0.0) || s.is_undefined() || v.is_undefined() {
        return TcaSolution::UNDEFINED
    }

    let mut best = TcaSolution { time: f64::NAN, norm: f64::INFINITY };

    // horizontal extremum
    let v_xy2 = v.horizontal_length_squared();
    if v_xy2 > EPS_V * EPS_V {
        consider( &mut best, -s.horizontal_dot(v) / v_xy2, s, v, radius, half_height, lookahead);
    }

    // vertical extremum
    if v.z.abs() > EPS_V {
        consider( &mut best, -s.z / v.z, s, v, radius, half_height, lookahead);
    }

    // branch switch points: (s_z + v_z·t)²/h² = |s_xy + v_xy·t|²/r²
    let h2 = half_height * half_height;
    let r2 = radius * radius;
    let a = (v.z * v.z) / h2 - v_xy2 / r2;
    let b = 2.0 * ((s.z * v.z) / h2 - s.horizontal_dot(v) / r2);
    let c = (s.z * s.z) / h2 - s.horizontal_length_squared() / r2;
    let [t1,t2] = solve_quadratic( a, b, c);
    consider( &mut best, t1, s, v, radius, half_height, lookahead);
    consider( &mut best, t2, s, v, radius, half_height, lookahead);

    // interval bounds
    consider( &mut best, 0.0, s, v, radius, half_height, lookahead);
    consider( &mut best, lookahead, s, v, radius, half_height, lookahead);

    if best.norm.is_finite() { best } else { TcaSolution::UNDEFINED }
}

#[inline]
fn consider (best: &mut TcaSolution, t: f64, s: &Cartesian3, v: &Cartesian3, radius: f64, half_height: f64, lookahead: f64) {
    if t.is_finite() && t >= 0.0 {
        let t = t.min(lookahead);
        let norm = cylindrical_norm( &s.extrapolate(v,t), radius, half_height);
        if norm < best.norm { // strict, first candidate wins ties
            best.time = t;
            best.norm = norm;
        }
    }
}

/// real roots of `a·x² + b·x + c = 0` in ascending order, missing roots are NaN
fn solve_quadratic (a: f64, b: f64, c: f64)->[f64;2] {
    if a.abs() < EPS_Q {
        if b.abs() < EPS_Q { [f64::NAN, f64::NAN] } else { [-c / b, f64::NAN] }

    } else {
        let disc = b*b - 4.0*a*c;
        if disc < 0.0 {
            [f64::NAN, f64::NAN]
        } else {
            let q = -0.5 * (b + b.signum() * disc.sqrt());
            if q == 0.0 { // b == 0 and c == 0 (double root at 0)
                [0.0, f64::NAN]
            } else {
                let x1 = q / a;
                let x2 = c / q;
                if x1 <= x2 { [x1,x2] } else { [x2,x1] }
            }
        }
    }
}

/// the closest approach prediction for one intruder and one advisory class. This is always updated
/// as a whole - either all fields are valid or the prediction is invalid (and all fields are NaN)
#[derive(Debug,Clone,Copy)]
pub struct TcaPrediction {
    valid: bool,
    prediction_time: f64,
    tca: f64,
    displacement: Cartesian3,
    norm: f64,
    horizontal_separation: f64,
    vertical_separation: f64,
}

impl TcaPrediction {
    pub fn invalid ()->Self {
        TcaPrediction {
            valid: false,
            prediction_time: f64::NAN,
            tca: f64::NAN,
            displacement: Cartesian3::nan(),
            norm: f64::NAN,
            horizontal_separation: f64::NAN,
            vertical_separation: f64::NAN,
        }
    }

    pub fn invalidate (&mut self) {
        *self = TcaPrediction::invalid();
    }

    /// recompute from relative position `s` and relative velocity `v` at `sim_time`
    pub fn update (&mut self, sim_time: f64, s: &Cartesian3, v: &Cartesian3, zone: &ZoneParameters)->bool {
        let sol = solve_tca( s, v, zone.radius, zone.half_height, zone.lookahead);
        if sol.is_defined() {
            let d = s.extrapolate( v, sol.time);
            *self = TcaPrediction {
                valid: true,
                prediction_time: sim_time,
                tca: sol.time,
                displacement: d,
                norm: sol.norm,
                horizontal_separation: d.horizontal_length(),
                vertical_separation: d.z.abs(),
            };
            true
        } else {
            self.invalidate();
            false
        }
    }

    pub fn is_valid (&self)->bool { self.valid }

    /// simulation time at which this prediction was computed
    pub fn prediction_time (&self)->f64 { self.prediction_time }

    /// time to closest approach in seconds (relative to `prediction_time`)
    pub fn tca (&self)->f64 { self.tca }

    /// relative position (intruder - own) at TCA
    pub fn displacement (&self)->&Cartesian3 { &self.displacement }

    pub fn norm (&self)->f64 { self.norm }
    pub fn horizontal_separation (&self)->f64 { self.horizontal_separation }
    pub fn vertical_separation (&self)->f64 { self.vertical_separation }

    /// valid and inside of the protected zone at TCA
    pub fn is_inside (&self)->bool { self.valid && self.norm <= 1.0 }
}

impl Default for TcaPrediction {
    fn default()->Self { TcaPrediction::invalid() }
}

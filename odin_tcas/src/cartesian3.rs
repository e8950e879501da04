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

use std::ops::Sub;
use serde::{Serialize,Deserialize};

/// a vector in our local Euclidean frame: x = east, y = north (equirectangular projection about the
/// own vehicle), z = altitude. All components are in meters (or meters/second for velocities).
/// 
/// Values are plain `Copy` data so that all the TCA math can be done on the stack.
/// Undefined vectors are represented by NaN components (see [`Cartesian3::nan`]).
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct Cartesian3 {
    pub x: f64,
    pub y: f64,
    pub z: f64
}

impl Cartesian3 {
    pub const fn new (x: f64, y: f64, z: f64)->Cartesian3 {
        Cartesian3{x,y,z}
    }

    pub const fn zero ()->Cartesian3 {
        Cartesian3{x: 0.0, y: 0.0, z: 0.0}
    }

    pub const fn nan ()->Cartesian3 {
        Cartesian3{x: f64::NAN, y: f64::NAN, z: f64::NAN}
    }

    pub fn set (&mut self, x: f64, y: f64, z: f64) {
        self.x = x;
        self.y = y;
        self.z = z;
    }

    pub fn set_nan (&mut self) {
        *self = Cartesian3::nan();
    }

    /// true if any component is NaN or infinite
    pub fn is_undefined (&self)->bool {
        !(self.x.is_finite() && self.y.is_finite() && self.z.is_finite())
    }

    //--- the horizontal (x/y) components, which is what we need for the cylindrical norm

    pub fn horizontal_dot (&self, p: &Cartesian3)->f64 {
        (self.x * p.x) + (self.y * p.y)
    }

    pub fn horizontal_length_squared (&self)->f64 {
        (self.x * self.x) + (self.y * self.y)
    }

    pub fn horizontal_length (&self)->f64 {
        self.horizontal_length_squared().sqrt()
    }

    /// linear extrapolation `self + v*t` (self being a position and `v` a velocity)
    #[inline]
    pub fn extrapolate (&self, v: &Cartesian3, t: f64)->Cartesian3 {
        Cartesian3 {
            x: self.x + v.x * t,
            y: self.y + v.y * t,
            z: self.z + v.z * t
        }
    }
}

impl std::fmt::Display for Cartesian3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[ {:.1}, {:.1}, {:.1} ]", self.x, self.y, self.z)
    }
}

impl Sub for &Cartesian3 {
    type Output = Cartesian3;

    fn sub (self, rhs: &Cartesian3) -> Cartesian3 {
        Cartesian3 { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
    }
}

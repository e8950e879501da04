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

//! unit helpers. Internally all computations use SI base units (meters, seconds, meters/second).
//! Aviation units only show up at the API boundary (uom quantities) and in configuration field names.

use uom::si::{
    f64::{Length,Velocity,Acceleration},
    length::{meter,foot,nautical_mile},
    velocity::{meter_per_second,knot,foot_per_minute},
    acceleration::{meter_per_second_squared,standard_gravity},
};

#[inline] pub fn meters (len: f64)->Length { Length::new::<meter>(len) }
#[inline] pub fn feet (len: f64)->Length { Length::new::<foot>(len) }
#[inline] pub fn nautical_miles (len: f64)->Length { Length::new::<nautical_mile>(len) }

#[inline] pub fn meters_per_second (v: f64)->Velocity { Velocity::new::<meter_per_second>(v) }
#[inline] pub fn knots (v: f64)->Velocity { Velocity::new::<knot>(v) }
#[inline] pub fn feet_per_minute (v: f64)->Velocity { Velocity::new::<foot_per_minute>(v) }

#[inline] pub fn gs (a: f64)->Acceleration { Acceleration::new::<standard_gravity>(a) }

//--- scalar conversions into/out of our internal SI representation (NaN stays NaN)

#[inline] pub fn ft_to_m (ft: f64)->f64 { feet(ft).get::<meter>() }
#[inline] pub fn m_to_ft (m: f64)->f64 { meters(m).get::<foot>() }
#[inline] pub fn nm_to_m (nm: f64)->f64 { nautical_miles(nm).get::<meter>() }
#[inline] pub fn kn_to_mps (kn: f64)->f64 { knots(kn).get::<meter_per_second>() }
#[inline] pub fn fpm_to_mps (fpm: f64)->f64 { feet_per_minute(fpm).get::<meter_per_second>() }
#[inline] pub fn mps_to_fpm (mps: f64)->f64 { meters_per_second(mps).get::<foot_per_minute>() }
#[inline] pub fn g_to_mps2 (g: f64)->f64 { gs(g).get::<meter_per_second_squared>() }

#[inline] pub fn length_m (len: &Length)->f64 { len.get::<meter>() }
#[inline] pub fn velocity_mps (v: &Velocity)->f64 { v.get::<meter_per_second>() }

/// mean earth radius in meters (spherical approximation for our local equirectangular frame)
pub const MEAN_EARTH_RADIUS: f64 = 6371000.0;

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

//! the kinematic data model that is shared between own vehicle and intruders

use uom::si::f64::{Length,Velocity};
use serde::{Serialize,Deserialize};

use crate::cartesian3::Cartesian3;
use crate::units::{length_m, velocity_mps, MEAN_EARTH_RADIUS};

#[inline]
pub fn normalize_180 (d: f64)->f64 {
    let x = d % 360.0;

    if x < -180.0 { 360.0 + x }
    else if x > 180.0 { x - 360.0 }
    else { x }
}

/// equirectangular projection about a reference point (normally the own vehicle position).
/// This is only accurate for the short ranges TCAS cares about, which is all we need.
#[derive(Debug,Clone,Copy)]
pub struct LocalFrame {
    lat0: f64, // degrees
    lon0: f64, // degrees
    cos_lat0: f64,
}

impl LocalFrame {
    pub fn new (lat0: f64, lon0: f64)->Self {
        let cos_lat0 = lat0.to_radians().cos().max(1e-6); // don't blow up at the poles
        LocalFrame { lat0, lon0, cos_lat0 }
    }

    pub fn origin (&self)->(f64,f64) { (self.lat0, self.lon0) }

    /// (lat,lon) in degrees -> (x,y) in meters (east,north)
    pub fn to_local (&self, lat: f64, lon: f64)->(f64,f64) {
        let dlon = normalize_180( lon - self.lon0);
        let x = dlon.to_radians() * self.cos_lat0 * MEAN_EARTH_RADIUS;
        let y = (lat - self.lat0).to_radians() * MEAN_EARTH_RADIUS;
        (x,y)
    }

    /// (x,y) in meters -> (lat,lon) in degrees
    pub fn to_geo (&self, x: f64, y: f64)->(f64,f64) {
        let lat = self.lat0 + (y / MEAN_EARTH_RADIUS).to_degrees();
        let lon = normalize_180( self.lon0 + (x / (MEAN_EARTH_RADIUS * self.cos_lat0)).to_degrees());
        (lat,lon)
    }
}

/// what we get from external position sources (contact feed or own vehicle sensors)
#[derive(Debug,Clone,Copy,Serialize,Deserialize)]
pub struct KinematicReport {
    pub latitude: f64,  // degrees
    pub longitude: f64, // degrees
    pub altitude: Length,
    pub ground_track: Option<f64>, // degrees true, None if undefined
    pub ground_speed: Velocity,
    pub vertical_speed: Velocity,
}

impl KinematicReport {
    pub fn new (latitude: f64, longitude: f64, altitude: Length, ground_track: Option<f64>, ground_speed: Velocity, vertical_speed: Velocity)->Self {
        KinematicReport { latitude, longitude, altitude, ground_track, ground_speed, vertical_speed }
    }
}

/// a traffic contact report. `last_contact` is the (monotonic) simulation time in seconds at which the
/// kinematic data was valid
#[derive(Debug,Clone,Copy,Serialize,Deserialize)]
pub struct ContactReport {
    pub kinematics: KinematicReport,
    pub last_contact: f64,
}

impl ContactReport {
    pub fn new (kinematics: KinematicReport, last_contact: f64)->Self {
        ContactReport { kinematics, last_contact }
    }
}

/// own vehicle sensor data
#[derive(Debug,Clone,Copy,Serialize,Deserialize)]
pub struct OwnReport {
    pub kinematics: KinematicReport,
    pub radar_altitude: Option<Length>,
    pub on_ground: bool,
    pub time: f64, // simulation time of the report
}

impl OwnReport {
    pub fn new (kinematics: KinematicReport, radar_altitude: Option<Length>, on_ground: bool, time: f64)->Self {
        OwnReport { kinematics, radar_altitude, on_ground, time }
    }

    /// altitude and radar altitude (m, NaN if not available) linearly extrapolated to `sim_time`. Never goes backwards
    pub fn altitudes_at (&self, sim_time: f64)->(f64,f64) {
        let dz = velocity_mps( &self.kinematics.vertical_speed) * (sim_time - self.time).max(0.0);
        let alt = length_m( &self.kinematics.altitude) + dz;
        let radar_alt = self.radar_altitude.as_ref().map( |ra| length_m(ra) + dz).unwrap_or( f64::NAN);
        (alt, radar_alt)
    }
}

/// the kinematic state of a tracked body in SI units. Position and velocity vectors are in the
/// [`LocalFrame`] of the current update cycle, i.e. they are only meaningful until the next update
/// (which is why they are not public fields).
#[derive(Debug,Clone,Copy)]
pub struct KinematicState {
    pub latitude: f64,       // degrees
    pub longitude: f64,      // degrees
    pub altitude: f64,       // m
    pub ground_track: f64,   // degrees true, NaN if undefined
    pub ground_speed: f64,   // m/s
    pub vertical_speed: f64, // m/s

    position: Cartesian3,
    velocity: Cartesian3,
}

impl KinematicState {
    pub fn undefined ()->Self {
        KinematicState {
            latitude: f64::NAN,
            longitude: f64::NAN,
            altitude: f64::NAN,
            ground_track: f64::NAN,
            ground_speed: f64::NAN,
            vertical_speed: f64::NAN,
            position: Cartesian3::nan(),
            velocity: Cartesian3::nan(),
        }
    }

    pub fn is_defined (&self)->bool {
        self.altitude.is_finite() && !self.position.is_undefined()
    }

    /// set scalars and vectors from a report. If the track is undefined we assume no horizontal motion
    pub fn update (&mut self, report: &KinematicReport, frame: &LocalFrame) {
        self.latitude = report.latitude;
        self.longitude = report.longitude;
        self.altitude = length_m( &report.altitude);
        self.ground_track = report.ground_track.unwrap_or(f64::NAN);
        self.ground_speed = velocity_mps( &report.ground_speed);
        self.vertical_speed = velocity_mps( &report.vertical_speed);

        let (x,y) = frame.to_local( self.latitude, self.longitude);
        self.position.set( x, y, self.altitude);

        if self.ground_track.is_finite() {
            let trk = self.ground_track.to_radians();
            self.velocity.set( self.ground_speed * trk.sin(), self.ground_speed * trk.cos(), self.vertical_speed);
        } else {
            self.velocity.set( 0.0, 0.0, self.vertical_speed);
        }
    }

    /// recompute the position vector from the geographic fields, e.g. after the frame origin moved
    pub fn project (&mut self, frame: &LocalFrame) {
        let (x,y) = frame.to_local( self.latitude, self.longitude);
        self.position.set( x, y, self.altitude);
    }

    /// move the state `dt` seconds forward along its velocity vector, keeping the scalar fields consistent
    pub fn extrapolate (&mut self, dt: f64, frame: &LocalFrame) {
        if dt != 0.0 && self.is_defined() {
            self.position = self.position.extrapolate( &self.velocity, dt);
            let (lat,lon) = frame.to_geo( self.position.x, self.position.y);
            self.latitude = lat;
            self.longitude = lon;
            self.altitude = self.position.z;
        }
    }

    pub fn invalidate (&mut self) {
        *self = KinematicState::undefined();
    }

    pub fn position (&self)->&Cartesian3 { &self.position }
    pub fn velocity (&self)->&Cartesian3 { &self.velocity }
}

impl Default for KinematicState {
    fn default()->Self { KinematicState::undefined() }
}

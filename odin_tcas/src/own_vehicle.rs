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

use crate::cartesian3::Cartesian3;
use crate::kinematic::{KinematicState, LocalFrame, OwnReport};

/// keeps track of the own vehicle kinematic state. Reports can come in at any time but are only
/// applied by [`OwnVehicleTracker::refresh`] at the beginning of an update cycle, so that all
/// intruders of a cycle are computed against the same own state at the same time.
///
/// The own vehicle is always the origin of the horizontal local frame, i.e. its position vector is
/// `(0, 0, altitude)`.
#[derive(Debug)]
pub struct OwnVehicleTracker {
    pending: Option<OwnReport>,
    last_report: Option<OwnReport>,
    state: KinematicState,
    frame: LocalFrame,
    radar_altitude: f64, // m, NaN if not available
    on_ground: bool,
}

impl OwnVehicleTracker {
    pub fn new ()->Self {
        OwnVehicleTracker {
            pending: None,
            last_report: None,
            state: KinematicState::undefined(),
            frame: LocalFrame::new( 0.0, 0.0),
            radar_altitude: f64::NAN,
            on_ground: false,
        }
    }

    /// store the latest own report. Does not touch the state until the next [`refresh`](Self::refresh)
    pub fn set_report (&mut self, report: OwnReport) {
        self.pending = Some(report);
    }

    /// the most recent report, pending or applied
    pub fn latest_report (&self)->Option<&OwnReport> {
        self.pending.as_ref().or( self.last_report.as_ref())
    }

    /// apply a pending report and extrapolate the own state to `sim_time`, re-centering the local frame on the
    /// extrapolated position. Returns false if we never got own vehicle data
    pub fn refresh (&mut self, sim_time: f64)->bool {
        if let Some(report) = self.pending.take() {
            self.last_report = Some(report);
        }
        let Some(report) = self.last_report.as_ref() else { return false };

        let k = &report.kinematics;
        let mut frame = LocalFrame::new( k.latitude, k.longitude);
        self.state.update( k, &frame);

        let dt = sim_time - report.time;
        if dt > 0.0 {
            self.state.extrapolate( dt, &frame);
            frame = LocalFrame::new( self.state.latitude, self.state.longitude);
            self.state.project( &frame);
        }

        self.frame = frame;
        self.radar_altitude = report.altitudes_at( sim_time).1;
        self.on_ground = report.on_ground;
        true
    }

    pub fn is_defined (&self)->bool { self.state.is_defined() }

    pub fn state (&self)->&KinematicState { &self.state }
    pub fn frame (&self)->&LocalFrame { &self.frame }

    pub fn altitude (&self)->f64 { self.state.altitude }
    pub fn vertical_speed (&self)->f64 { self.state.vertical_speed }
    pub fn radar_altitude (&self)->f64 { self.radar_altitude }
    pub fn on_ground (&self)->bool { self.on_ground }

    pub fn position (&self)->&Cartesian3 { self.state.position() }
    pub fn velocity (&self)->&Cartesian3 { self.state.velocity() }

    pub fn predicted_altitude (&self, dt: f64)->f64 {
        self.state.altitude + self.state.vertical_speed * dt
    }
}

impl Default for OwnVehicleTracker {
    fn default()->Self { OwnVehicleTracker::new() }
}

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

use std::{fmt, sync::Arc};

use crate::alert::AlertLevel;
use crate::cartesian3::Cartesian3;
use crate::kinematic::{ContactReport, KinematicState};
use crate::own_vehicle::OwnVehicleTracker;
use crate::sensitivity::Sensitivity;
use crate::tca::TcaPrediction;
use crate::units::{length_m, velocity_mps};

/// stable identifier of a traffic contact. We keep it in an Arc so that we can clone it into events
/// and the advisory intruder list without heap allocation
pub type ContactId = Arc<String>;

/// a tracked traffic contact with its relative motion and closest approach predictions
#[derive(Debug)]
pub struct Intruder {
    id: ContactId,
    report: ContactReport, // latest contact report, only evaluated within update cycles

    state: KinematicState,
    rel_position: Cartesian3, // intruder - own
    rel_velocity: Cartesian3, // intruder - own
    valid: bool,

    ta_prediction: TcaPrediction,
    ra_prediction: TcaPrediction,

    alert_level: AlertLevel,
}

impl Intruder {
    pub fn new (id: ContactId, report: ContactReport)->Self {
        Intruder {
            id,
            report,
            state: KinematicState::undefined(),
            rel_position: Cartesian3::nan(),
            rel_velocity: Cartesian3::nan(),
            valid: false,
            ta_prediction: TcaPrediction::invalid(),
            ra_prediction: TcaPrediction::invalid(),
            alert_level: AlertLevel::None,
        }
    }

    pub fn id (&self)->&ContactId { &self.id }

    /// store a new contact report. Geometry is only recomputed by the next update cycle
    pub fn set_report (&mut self, report: ContactReport) {
        self.report = report;
    }

    pub fn report (&self)->&ContactReport { &self.report }

    /// do we have enough data to predict the motion of this contact
    pub fn has_sufficient_data (report: &ContactReport, min_ground_speed: f64)->bool {
        let k = &report.kinematics;
        k.latitude.is_finite() && k.longitude.is_finite() && length_m( &k.altitude).is_finite()
            && k.ground_track.is_some_and( |trk| trk.is_finite())
            && velocity_mps( &k.ground_speed) >= min_ground_speed
            && velocity_mps( &k.vertical_speed).is_finite()
    }

    /// recompute state, relative motion and both TCA predictions for the current cycle. The reported position is
    /// extrapolated to `sim_time` if the report is older. Returns false if the data is insufficient, in which case all
    /// geometry is set to NaN
    pub fn update_predictions (&mut self, sim_time: f64, own: &OwnVehicleTracker, sensitivity: &Sensitivity, min_ground_speed: f64)->bool {
        if !own.is_defined() || !Intruder::has_sufficient_data( &self.report, min_ground_speed) {
            self.invalidate();
            return false
        }

        let frame = own.frame();
        self.state.update( &self.report.kinematics, frame);
        let dt = sim_time - self.report.last_contact;
        if dt > 0.0 {
            self.state.extrapolate( dt, frame);
        }

        self.rel_position = self.state.position() - own.position();
        self.rel_velocity = self.state.velocity() - own.velocity();
        self.valid = true;

        self.ta_prediction.update( sim_time, &self.rel_position, &self.rel_velocity, &sensitivity.traffic);
        self.ra_prediction.update( sim_time, &self.rel_position, &self.rel_velocity, &sensitivity.resolution);
        true
    }

    pub fn invalidate (&mut self) {
        self.valid = false;
        self.state.invalidate();
        self.rel_position.set_nan();
        self.rel_velocity.set_nan();
        self.ta_prediction.invalidate();
        self.ra_prediction.invalidate();
    }

    pub fn is_valid (&self)->bool { self.valid }

    pub fn state (&self)->&KinematicState { &self.state }
    pub fn relative_position (&self)->&Cartesian3 { &self.rel_position }
    pub fn relative_velocity (&self)->&Cartesian3 { &self.rel_velocity }

    pub fn ta_prediction (&self)->&TcaPrediction { &self.ta_prediction }
    pub fn ra_prediction (&self)->&TcaPrediction { &self.ra_prediction }

    pub fn alert_level (&self)->AlertLevel { self.alert_level }
    pub (crate) fn set_alert_level (&mut self, level: AlertLevel) { self.alert_level = level; }

    /// current (not predicted) horizontal distance to own vehicle
    pub fn horizontal_separation (&self)->f64 { self.rel_position.horizontal_length() }

    /// current (not predicted) altitude difference to own vehicle (positive if intruder is above)
    pub fn relative_altitude (&self)->f64 { self.rel_position.z }
}

impl fmt::Display for Intruder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "Intruder( id: {}, level: {:?}", self.id, self.alert_level)?;
        if self.valid {
            write!( f, ", rel: {}", self.rel_position)?;
            if self.ra_prediction.is_valid() {
                write!( f, ", ra_tca: {:.1}s, ra_norm: {:.2}", self.ra_prediction.tca(), self.ra_prediction.norm())?;
            }
            if self.ta_prediction.is_valid() {
                write!( f, ", ta_tca: {:.1}s, ta_norm: {:.2}", self.ta_prediction.tca(), self.ta_prediction.norm())?;
            }
        } else {
            write!( f, ", invalid")?;
        }
        write!( f, ")")
    }
}

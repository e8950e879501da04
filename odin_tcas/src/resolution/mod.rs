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

//! the resolution advisory (RA) engine. There is at most one active advisory, which covers all intruders
//! at resolution level. Only the intruder with the earliest TCA drives the vertical speed target, the others
//! are just listed in the advisory.

pub mod sense;

use std::fmt;
use bitflags::bitflags;
use serde::Serialize;
use tracing::{debug,info};

use crate::config::RaConfig;
use crate::intruder::{ContactId, Intruder};
use crate::own_vehicle::OwnVehicleTracker;
use crate::policy::{allows_increase, allows_sense, TcasPolicy};
use crate::sensitivity::Sensitivity;
use crate::units::mps_to_fpm;
use sense::{required_vertical_speed, select_sense, ResponseModel, Sense, SenseInput, SenseSolution, VsEnvelope};

const VS_TOL: f64 = 0.05; // [m/s] (~10 fpm) tolerance for own vertical speed vs. advisory target

bitflags! {
    /// descriptive advisory flags, recomputed every cycle
    #[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Default,Serialize)]
    pub struct RaFlags: u32 {
        const INITIAL = 1 << 0;
        const CORRECTIVE = 1 << 1;
        const UP_SENSE = 1 << 2;
        const DOWN_SENSE = 1 << 3;
        const CROSSING = 1 << 4;
        const CLIMB = 1 << 5;
        const DESCEND = 1 << 6;
        const INCREASE = 1 << 7;
        const REDUCE_CLIMB = 1 << 8;
        const REDUCE_DESCENT = 1 << 9;
        const DO_NOT_CLIMB = 1 << 10;
        const DO_NOT_DESCEND = 1 << 11;
    }
}

/// snapshot of the aggregate advisory state. Exactly one of the vertical speed bounds is defined while
/// the advisory is active, the other one is NaN (unconstrained side)
#[derive(Debug,Clone,Serialize)]
pub struct ResolutionAdvisory {
    pub intruders: Vec<ContactId>, // sorted by increasing TCA
    pub min_vertical_speed: f64,   // m/s
    pub max_vertical_speed: f64,   // m/s
    pub flags: RaFlags,
}

impl ResolutionAdvisory {
    pub fn new ()->Self {
        ResolutionAdvisory {
            intruders: Vec::new(),
            min_vertical_speed: f64::NAN,
            max_vertical_speed: f64::NAN,
            flags: RaFlags::empty(),
        }
    }

    pub fn clear (&mut self) {
        self.intruders.clear();
        self.min_vertical_speed = f64::NAN;
        self.max_vertical_speed = f64::NAN;
        self.flags = RaFlags::empty();
    }

    /// the sense is implied by which bound is defined
    pub fn sense (&self)->Option<Sense> {
        if !self.min_vertical_speed.is_nan() { Some(Sense::Up) }
        else if !self.max_vertical_speed.is_nan() { Some(Sense::Down) }
        else { None }
    }

    /// the defined vertical speed bound, NaN if there is no advisory
    pub fn target_vertical_speed (&self)->f64 {
        match self.sense() {
            Some(Sense::Up) => self.min_vertical_speed,
            Some(Sense::Down) => self.max_vertical_speed,
            None => f64::NAN
        }
    }

    pub fn min_vertical_speed_fpm (&self)->f64 { mps_to_fpm( self.min_vertical_speed) }
    pub fn max_vertical_speed_fpm (&self)->f64 { mps_to_fpm( self.max_vertical_speed) }

    fn set_target (&mut self, sense: Sense, target: f64) {
        match sense {
            Sense::Up => {
                self.min_vertical_speed = target;
                self.max_vertical_speed = f64::NAN;
            }
            Sense::Down => {
                self.min_vertical_speed = f64::NAN;
                self.max_vertical_speed = target;
            }
        }
    }
}

impl Default for ResolutionAdvisory {
    fn default()->Self { ResolutionAdvisory::new() }
}

impl fmt::Display for ResolutionAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "RA(")?;
        match self.sense() {
            Some(Sense::Up) => write!( f, "vs >= {:.0}fpm", self.min_vertical_speed_fpm())?,
            Some(Sense::Down) => write!( f, "vs <= {:.0}fpm", self.max_vertical_speed_fpm())?,
            None => write!( f, "none")?
        }
        write!( f, ", flags: {:?}, intruders: [", self.flags)?;
        for (i,id) in self.intruders.iter().enumerate() {
            if i > 0 { write!( f, ",")?; }
            write!( f, "{id}")?;
        }
        write!( f, "])")
    }
}

#[inline]
fn same_f64 (a: f64, b: f64)->bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// what happened to the advisory within an update
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum RaChange {
    Issued,
    Updated,
    Canceled,
}

#[derive(Debug)]
pub struct ResolutionAdvisoryEngine {
    initial: ResponseModel,
    subsequent: ResponseModel,
    envelope: VsEnvelope,

    active_set: Vec<ContactId>, // intruders at resolution level
    advisory: ResolutionAdvisory,
    is_active: bool,
    reversal_available: bool,
    reaches_target: bool,
    issue_time: f64,
}

impl ResolutionAdvisoryEngine {
    pub fn new (config: &RaConfig)->Self {
        ResolutionAdvisoryEngine {
            initial: ResponseModel::initial( config),
            subsequent: ResponseModel::subsequent( config),
            envelope: VsEnvelope::new( config),
            active_set: Vec::new(),
            advisory: ResolutionAdvisory::new(),
            is_active: false,
            reversal_available: true,
            reaches_target: true,
            issue_time: f64::NAN,
        }
    }

    pub fn envelope (&self)->&VsEnvelope { &self.envelope }

    pub fn add_intruder (&mut self, id: &ContactId) {
        if !self.active_set.iter().any( |e| e == id) {
            self.active_set.push( id.clone());
        }
    }

    pub fn remove_intruder (&mut self, id: &str)->bool {
        let len = self.active_set.len();
        self.active_set.retain( |e| e.as_str() != id);
        self.active_set.len() < len
    }

    pub fn active_intruders (&self)->&[ContactId] { self.active_set.as_slice() }

    pub fn is_active (&self)->bool { self.is_active }
    pub fn advisory (&self)->&ResolutionAdvisory { &self.advisory }
    pub fn is_reversal_available (&self)->bool { self.reversal_available }

    /// false if the current target is not predicted to achieve ALIM separation at TCA
    pub fn reaches_target (&self)->bool { self.reaches_target }

    /// simulation time at which the current advisory was issued (NaN if there is none)
    pub fn issue_time (&self)->f64 { self.issue_time }

    /// consume the engine. There is no way to reuse it afterwards
    pub fn destroy (mut self) {
        self.active_set.clear();
        self.advisory.clear();
    }

    /// called once per cycle after all alert levels have been updated
    pub fn update<P> (&mut self, sim_time: f64, intruders: &[Intruder], own: &OwnVehicleTracker, sensitivity: &Sensitivity, policy: &P)->Option<RaChange>
        where P: TcasPolicy + ?Sized
    {
        // resolve members, dropping the ones that are not tracked anymore
        let mut members: Vec<&Intruder> = Vec::with_capacity( self.active_set.len());
        for id in &self.active_set {
            if let Some(intruder) = intruders.iter().find( |i| i.id() == id) {
                members.push( intruder);
            }
        }
        if members.len() < self.active_set.len() {
            self.active_set.retain( |id| intruders.iter().any( |i| i.id() == id));
        }

        if members.is_empty() {
            return self.cancel()
        }

        // stable sort by increasing TCA (invalid predictions last)
        members.sort_by( |a,b| tca_key(a).total_cmp( &tca_key(b)));
        let primary = members[0];

        let intruders_changed = self.advisory.intruders.len() != members.len()
            || self.advisory.intruders.iter().zip( members.iter()).any( |(id,i)| id != i.id());
        if intruders_changed {
            self.advisory.intruders.clear();
            self.advisory.intruders.extend( members.iter().map( |i| i.id().clone()));
        }

        if !self.is_active {
            if self.issue( sim_time, primary, own, sensitivity, policy) {
                Some(RaChange::Issued)
            } else {
                self.advisory.clear();
                None
            }
        } else {
            let target_before = self.advisory.target_vertical_speed();
            let sense_before = self.advisory.sense();
            let flags_before = self.advisory.flags;

            self.revise( primary, own, sensitivity, policy);

            if intruders_changed || sense_before != self.advisory.sense()
                || !same_f64( target_before, self.advisory.target_vertical_speed()) || flags_before != self.advisory.flags {
                Some(RaChange::Updated)
            } else {
                None
            }
        }
    }

    /// cancel the active advisory. This also resets the reversal permission
    pub fn cancel (&mut self)->Option<RaChange> {
        self.active_set.clear();
        if self.is_active {
            info!("RA canceled (issued at {:.1}s)", self.issue_time);
            self.advisory.clear();
            self.is_active = false;
            self.reversal_available = true;
            self.reaches_target = true;
            self.issue_time = f64::NAN;
            Some(RaChange::Canceled)
        } else {
            None
        }
    }

    fn issue<P> (&mut self, sim_time: f64, primary: &Intruder, own: &OwnVehicleTracker, sensitivity: &Sensitivity, policy: &P)->bool
        where P: TcasPolicy + ?Sized
    {
        let Some(input) = sense_input( primary, own, sensitivity) else {
            debug!("cannot issue RA for {}, no usable prediction", primary.id());
            return false
        };

        let sol = select_sense( &input, &self.initial, &self.envelope, |s| allows_sense( policy, s, own), None);
        self.advisory.set_target( sol.sense, sol.target_vs);
        self.advisory.flags = compute_flags( &input, sol.sense, sol.target_vs, &self.envelope) | RaFlags::INITIAL;

        self.is_active = true;
        self.reversal_available = true;
        self.reaches_target = sol.reaches_target;
        self.issue_time = sim_time;

        info!("{} issued for {} at {:.1}s (tca: {:.1}s, reaches target: {})", self.advisory, primary.id(), sim_time, input.tca, sol.reaches_target);
        true
    }

    fn revise<P> (&mut self, primary: &Intruder, own: &OwnVehicleTracker, sensitivity: &Sensitivity, policy: &P)
        where P: TcasPolicy + ?Sized
    {
        let Some(sense) = self.advisory.sense() else { return };
        let Some(input) = sense_input( primary, own, sensitivity) else { return }; // hold what we have

        let model = self.subsequent;
        let current = self.advisory.target_vertical_speed();
        let dz = input.target_altitude( sense) - input.own_altitude;
        let required = required_vertical_speed( dz, input.tca, input.own_vertical_speed, &model);

        let met = input.reaches_target( sense, current, &model);
        let uc = sense.sign() * current;

        let mut next: Option<f64> = None;
        let mut try_reversal = false;

        match required {
            Some(vt) => {
                let q = self.envelope.quantize( sense, vt, true);
                let uq = sense.sign() * q;

                if uq > uc + VS_TOL && !met { // strengthen
                    if self.is_permitted( sense, q, own, policy) {
                        next = Some(q);
                    } else {
                        try_reversal = true;
                    }
                } else if uq < uc - VS_TOL && !self.envelope.is_limit( sense, current) { // weaken, but not below a limit
                    next = Some( sense.sign() * uq.max(0.0) + 0.0);
                }
            }
            None if met => { // beyond the target altitude, weaken to what we already comply with
                let ul = sense.sign() * self.envelope.complying_limit( sense, input.own_vertical_speed);
                if ul < uc - VS_TOL && !self.envelope.is_limit( sense, current) {
                    next = Some( sense.sign() * ul.max(0.0) + 0.0);
                }
            }
            None => try_reversal = true
        }

        let mut new_sense = sense;
        if try_reversal {
            if let Some(sol) = self.reversal( &input, sense, own, policy) {
                info!("RA reversed from {} to {} (target {:.0}fpm)", sense, sol.sense, mps_to_fpm( sol.target_vs));
                self.reversal_available = false;
                new_sense = sol.sense;
                self.advisory.set_target( sol.sense, sol.target_vs);
                self.reaches_target = true;
            } else {
                next = Some( self.strongest_permitted( sense, own, policy));
            }
        }

        if new_sense == sense {
            let target = next.unwrap_or( current);
            if next.is_some() {
                self.advisory.set_target( sense, target);
            }
            self.reaches_target = input.reaches_target( sense, target, &model);
        }

        let target = self.advisory.target_vertical_speed();
        let mut flags = compute_flags( &input, new_sense, target, &self.envelope);
        if new_sense == sense && same_f64( target, current) && self.advisory.flags.contains( RaFlags::INITIAL) {
            flags |= RaFlags::INITIAL;
        }
        if flags != self.advisory.flags || !same_f64( target, current) || new_sense != sense {
            debug!("RA revised: {} -> {}fpm {:?}", sense, mps_to_fpm(target).round(), flags);
        }
        self.advisory.flags = flags;
    }

    /// one shot reversal based on the subsequent response model. Only accepted if it reaches the target altitude
    fn reversal<P> (&self, input: &SenseInput, sense: Sense, own: &OwnVehicleTracker, policy: &P)->Option<SenseSolution>
        where P: TcasPolicy + ?Sized
    {
        if !self.reversal_available || !policy.allow_reversal( own) {
            return None
        }

        let sol = select_sense( input, &self.subsequent, &self.envelope, |s| allows_sense( policy, s, own), Some(sense.opposite()));
        if sol.reaches_target && sol.sense != sense { Some(sol) } else { None }
    }

    fn is_permitted<P> (&self, sense: Sense, target: f64, own: &OwnVehicleTracker, policy: &P)->bool
        where P: TcasPolicy + ?Sized
    {
        if self.envelope.is_increase( sense, target) {
            allows_increase( policy, sense, own)
        } else if !self.envelope.is_limit( sense, target) {
            allows_sense( policy, sense, own)
        } else {
            true // limits are always allowed
        }
    }

    fn strongest_permitted<P> (&self, sense: Sense, own: &OwnVehicleTracker, policy: &P)->f64
        where P: TcasPolicy + ?Sized
    {
        if allows_sense( policy, sense, own) {
            if allows_increase( policy, sense, own) {
                sense.sign() * self.envelope.increase
            } else {
                sense.sign() * self.envelope.climb
            }
        } else {
            0.0
        }
    }
}

fn tca_key (intruder: &Intruder)->f64 {
    let pred = intruder.ra_prediction();
    if pred.is_valid() { pred.tca() } else { f64::INFINITY }
}

/// the altitudes we need for sense selection, based on the RA prediction of the primary intruder.
/// None if there is no usable prediction (in which case we hold the current advisory)
fn sense_input (primary: &Intruder, own: &OwnVehicleTracker, sensitivity: &Sensitivity)->Option<SenseInput> {
    let pred = primary.ra_prediction();
    if !pred.is_valid() || !own.is_defined() || !(sensitivity.alim.is_finite() && sensitivity.alim > 0.0) {
        return None
    }

    let tca = pred.tca();
    let own_altitude_at_tca = own.predicted_altitude( tca);

    Some( SenseInput {
        tca,
        alim: sensitivity.alim,
        own_altitude: own.altitude(),
        own_vertical_speed: own.vertical_speed(),
        own_altitude_at_tca,
        intruder_altitude_at_tca: own_altitude_at_tca + pred.displacement().z,
    })
}

/// descriptive flags for the given target, based on the current own vertical speed
fn compute_flags (input: &SenseInput, sense: Sense, target: f64, envelope: &VsEnvelope)->RaFlags {
    let v0 = input.own_vertical_speed;
    let mut flags = match sense {
        Sense::Up => RaFlags::UP_SENSE,
        Sense::Down => RaFlags::DOWN_SENSE,
    };

    if input.is_crossing( sense) {
        flags |= RaFlags::CROSSING;
    }

    let corrective = sense.sign() * (target - v0) > VS_TOL;
    if corrective {
        flags |= RaFlags::CORRECTIVE;
    }

    if envelope.is_limit( sense, target) {
        flags |= match (sense, corrective) {
            (Sense::Up, true) => RaFlags::REDUCE_DESCENT,
            (Sense::Up, false) => RaFlags::DO_NOT_DESCEND,
            (Sense::Down, true) => RaFlags::REDUCE_CLIMB,
            (Sense::Down, false) => RaFlags::DO_NOT_CLIMB,
        };
    } else {
        flags |= match sense {
            Sense::Up => RaFlags::CLIMB,
            Sense::Down => RaFlags::DESCEND,
        };
        if envelope.is_increase( sense, target) {
            flags |= RaFlags::INCREASE;
        }
    }

    flags
}

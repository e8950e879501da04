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

//! the update scheduler. [`Tcas`] owns all tracked intruders, the own vehicle tracker, the sensitivity
//! provider and the resolution advisory engine, and runs the rate limited update cycle.
//!
//! Contact and own reports can be set at any time between cycles. They are only stored - all geometry
//! is computed within [`Tcas::update`].

use std::{cmp::Ordering, sync::Arc, time::{Duration, Instant}};
use tracing::{debug,info};

use crate::alert::{next_alert_level, AlertCounts, AlertLevel};
use crate::config::TcasConfig;
use crate::events::{EventPublisher, TcasEvent, TcasEventAction};
use crate::intruder::{ContactId, Intruder};
use crate::kinematic::{ContactReport, OwnReport};
use crate::own_vehicle::OwnVehicleTracker;
use crate::policy::{DefaultTcasPolicy, OperatingMode, TcasPolicy};
use crate::resolution::{RaChange, ResolutionAdvisory, ResolutionAdvisoryEngine};
use crate::sensitivity::{Sensitivity, SensitivityProvider};
use crate::tca::TcaPrediction;
use crate::units::kn_to_mps;

const SIM_EPS: f64 = 1e-9;

/// gate that only opens if both the wall clock and the simulation time advanced by at least their
/// minimum intervals since the last time it opened. A frequency <= 0 disables the respective cap
#[derive(Debug,Clone)]
pub struct RateLimiter {
    min_real_interval: Option<Duration>,
    min_sim_interval: f64,
    last_real: Option<Instant>,
    last_sim: f64,
}

impl RateLimiter {
    pub fn new (max_real_freq: f64, max_sim_freq: f64)->Self {
        let min_real_interval = if max_real_freq > 0.0 { Some( Duration::from_secs_f64( 1.0 / max_real_freq)) } else { None };
        let min_sim_interval = if max_sim_freq > 0.0 { 1.0 / max_sim_freq } else { 0.0 };
        RateLimiter { min_real_interval, min_sim_interval, last_real: None, last_sim: f64::NAN }
    }

    /// check if we can run a cycle at the given times, and if so record them
    pub fn try_pass (&mut self, sim_time: f64, now: Instant)->bool {
        if let (Some(min),Some(last)) = (self.min_real_interval, self.last_real) {
            if now.saturating_duration_since( last) < min { return false }
        }
        if self.min_sim_interval > 0.0 && !self.last_sim.is_nan() {
            if (sim_time - self.last_sim).abs() + SIM_EPS < self.min_sim_interval { return false }
        }

        self.last_real = Some(now);
        self.last_sim = sim_time;
        true
    }

    pub fn reset (&mut self) {
        self.last_real = None;
        self.last_sim = f64::NAN;
    }
}

pub struct Tcas<P: TcasPolicy = DefaultTcasPolicy> {
    config: TcasConfig,
    policy: P,
    mode: OperatingMode,

    sensitivity: SensitivityProvider,
    own: OwnVehicleTracker,
    intruders: Vec<Intruder>, // sorted after each cycle, the first n_filtered are evaluated
    n_filtered: usize,
    ra_engine: ResolutionAdvisoryEngine,

    limiter: RateLimiter,
    publisher: EventPublisher,
    counts: AlertCounts,
    n_cycles: u64,
}

impl Tcas<DefaultTcasPolicy> {
    pub fn with_config (config: TcasConfig)->Self {
        let policy = DefaultTcasPolicy::new( &config.ra);
        Tcas::new( config, policy)
    }
}

impl<P: TcasPolicy> Tcas<P> {
    pub fn new (config: TcasConfig, policy: P)->Self {
        Tcas {
            policy,
            mode: config.initial_mode,
            sensitivity: SensitivityProvider::new( config.sensitivity_levels.clone()),
            own: OwnVehicleTracker::new(),
            intruders: Vec::new(),
            n_filtered: 0,
            ra_engine: ResolutionAdvisoryEngine::new( &config.ra),
            limiter: RateLimiter::new( config.max_real_update_freq, config.max_sim_update_freq),
            publisher: EventPublisher::new(),
            counts: AlertCounts::default(),
            n_cycles: 0,
            config,
        }
    }

    pub fn config (&self)->&TcasConfig { &self.config }
    pub fn policy (&self)->&P { &self.policy }

    pub fn add_action<A> (&mut self, action: A) where A: TcasEventAction + 'static {
        self.publisher.add_action( Box::new( action));
    }

    pub fn num_actions (&self)->usize { self.publisher.num_actions() }

    //--- input (can be called any time between cycles)

    /// add a new contact or store the latest report of a known one
    pub fn report_contact (&mut self, id: &str, report: ContactReport) {
        if let Some(intruder) = self.intruders.iter_mut().find( |i| i.id().as_str() == id) {
            intruder.set_report( report);
        } else {
            debug!("new contact {}", id);
            self.intruders.push( Intruder::new( Arc::new( id.to_string()), report));
        }
    }

    /// drop a contact, which also retracts it from an active advisory. Returns false if the contact is unknown
    pub fn remove_contact (&mut self, id: &str)->bool {
        if let Some(idx) = self.intruders.iter().position( |i| i.id().as_str() == id) {
            self.intruders.remove( idx);
            if idx < self.n_filtered { self.n_filtered -= 1; }
            self.ra_engine.remove_intruder( id);
            debug!("removed contact {}", id);
            true
        } else {
            false
        }
    }

    pub fn set_own_report (&mut self, report: OwnReport) {
        self.own.set_report( report);
    }

    /// set the operating mode. Switching to standby resets all alert levels and cancels an active advisory right away
    pub fn set_operating_mode (&mut self, mode: OperatingMode) {
        if mode == self.mode { return }

        info!("operating mode {} -> {}", self.mode, mode);
        self.mode = mode;
        self.publisher.queue( TcasEvent::OperatingModeChanged(mode));

        if mode == OperatingMode::Standby {
            for intruder in self.intruders.iter_mut() {
                let previous = intruder.alert_level();
                if previous != AlertLevel::None {
                    intruder.set_alert_level( AlertLevel::None);
                    self.publisher.queue( TcasEvent::AlertLevelChanged { id: intruder.id().clone(), previous, current: AlertLevel::None });
                }
            }
            if self.ra_engine.cancel().is_some() {
                self.publisher.queue( TcasEvent::RaCanceled);
            }
            self.set_counts( AlertCounts::default());
            self.limiter.reset();
        }

        self.publisher.publish();
    }

    pub fn operating_mode (&self)->OperatingMode { self.mode }

    //--- the update cycle

    /// to be called on each simulation clock tick. Returns true if a cycle was executed
    pub fn update (&mut self, sim_time: f64)->bool {
        self.update_at( sim_time, Instant::now())
    }

    /// same as [`update`](Self::update) but with explicit wall clock time, for simulations that run faster than real time
    pub fn update_at (&mut self, sim_time: f64, now: Instant)->bool {
        if self.mode == OperatingMode::Standby || !self.limiter.try_pass( sim_time, now) {
            return false
        }

        self.run_cycle( sim_time);
        true
    }

    fn run_cycle (&mut self, sim_time: f64) {
        self.n_cycles += 1;

        // sensitivity first since all predictions of this cycle depend on it
        if let Some(report) = self.own.latest_report() {
            let (alt, radar_alt) = report.altitudes_at( sim_time);
            let on_ground = report.on_ground;
            self.sensitivity.update( alt, radar_alt, on_ground);
        }
        let sensitivity: Sensitivity = *self.sensitivity.current();

        self.own.refresh( sim_time);

        let min_gs = kn_to_mps( self.config.min_ground_speed_kn);
        for intruder in self.intruders.iter_mut() {
            intruder.update_predictions( sim_time, &self.own, &sensitivity, min_gs);
        }

        self.intruders.sort_by( compare_intruders); // stable
        self.n_filtered = self.intruders.len().min( self.config.max_intruder_count);

        let mut counts = AlertCounts::default();
        for (i,intruder) in self.intruders.iter_mut().enumerate() {
            let previous = intruder.alert_level();
            let current = if i < self.n_filtered && intruder.is_valid() {
                next_alert_level( intruder, &sensitivity, self.mode, &self.policy)
            } else {
                AlertLevel::None
            };

            if current != previous {
                debug!("{} alert level {} -> {}", intruder.id(), previous, current);
                intruder.set_alert_level( current);

                if current == AlertLevel::Resolution {
                    self.ra_engine.add_intruder( intruder.id());
                } else if previous == AlertLevel::Resolution {
                    self.ra_engine.remove_intruder( intruder.id());
                }
                self.publisher.queue( TcasEvent::AlertLevelChanged { id: intruder.id().clone(), previous, current });
            }
            counts.add( current);
        }
        self.set_counts( counts);

        match self.ra_engine.update( sim_time, &self.intruders, &self.own, &sensitivity, &self.policy) {
            Some(RaChange::Issued) => self.publisher.queue( TcasEvent::RaIssued( self.ra_engine.advisory().clone())),
            Some(RaChange::Updated) => self.publisher.queue( TcasEvent::RaUpdated( self.ra_engine.advisory().clone())),
            Some(RaChange::Canceled) => self.publisher.queue( TcasEvent::RaCanceled),
            None => {}
        }

        debug!("cycle {} at {:.2}s: SL{}, {} intruders ({} filtered), PA:{} TA:{} RA:{}", self.n_cycles, sim_time, sensitivity.level,
               self.intruders.len(), self.n_filtered, counts.proximity, counts.traffic, counts.resolution);

        self.publisher.publish();
    }

    fn set_counts (&mut self, counts: AlertCounts) {
        if counts != self.counts {
            self.counts = counts;
            self.publisher.queue( TcasEvent::AlertCountsChanged(counts));
        }
    }

    //--- read-only snapshots, valid until the next cycle

    /// all tracked intruders in the order of the last cycle (new contacts at the end)
    pub fn intruders (&self)->&[Intruder] { self.intruders.as_slice() }

    /// the intruders that were evaluated in the last cycle
    pub fn filtered_intruders (&self)->&[Intruder] {
        &self.intruders[..self.n_filtered.min( self.intruders.len())]
    }

    pub fn intruder (&self, id: &str)->Option<&Intruder> {
        self.intruders.iter().find( |i| i.id().as_str() == id)
    }

    pub fn alert_counts (&self)->AlertCounts { self.counts }

    pub fn advisory (&self)->Option<&ResolutionAdvisory> {
        if self.ra_engine.is_active() { Some( self.ra_engine.advisory()) } else { None }
    }

    pub fn ra_engine (&self)->&ResolutionAdvisoryEngine { &self.ra_engine }
    pub fn resolution_intruders (&self)->&[ContactId] { self.ra_engine.active_intruders() }

    pub fn own_vehicle (&self)->&OwnVehicleTracker { &self.own }
    pub fn sensitivity (&self)->&Sensitivity { self.sensitivity.current() }
    pub fn num_cycles (&self)->u64 { self.n_cycles }
}

fn norm_key (prediction: &TcaPrediction)->f64 {
    if prediction.is_valid() && !prediction.norm().is_nan() { prediction.norm() } else { f64::INFINITY }
}

/// valid intruders first, ordered by RA and then TA severity. Invalid ones keep their relative order at the end
fn compare_intruders (a: &Intruder, b: &Intruder)->Ordering {
    match (a.is_valid(), b.is_valid()) {
        (true,true) => norm_key( a.ra_prediction()).total_cmp( &norm_key( b.ra_prediction()))
            .then_with( || norm_key( a.ta_prediction()).total_cmp( &norm_key( b.ta_prediction()))),
        (true,false) => Ordering::Less,
        (false,true) => Ordering::Greater,
        (false,false) => Ordering::Equal,
    }
}

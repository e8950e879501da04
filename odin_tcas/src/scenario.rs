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

//! a deterministic straight line traffic simulation that drives a [`Tcas`] instance. Intruders fly
//! constant tracks, speeds and vertical speeds. The own vehicle does the same unless `follow_ra` is
//! set, in which case it responds to advisories with the initial response model (delay + constant
//! acceleration towards the advisory bound).

use std::{cell::RefCell, collections::HashSet, fs, path::Path, rc::Rc, time::{Duration, Instant}};
use serde::{Serialize,Deserialize};
use tracing::info;

use crate::alert::AlertLevel;
use crate::config::TcasConfig;
use crate::errors::{scenario_error, Result};
use crate::events::{TcasEvent, TcasEventAction};
use crate::kinematic::{ContactReport, KinematicReport, OwnReport};
use crate::policy::{DefaultTcasPolicy, OperatingMode};
use crate::resolution::sense::Sense;
use crate::tcas::Tcas;
use crate::units::{fpm_to_mps, ft_to_m, g_to_mps2, kn_to_mps, m_to_ft, meters, meters_per_second, MEAN_EARTH_RADIUS};

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct VehicleSpec {
    pub id: String,
    pub lat: f64,        // degrees
    pub lon: f64,        // degrees
    pub alt_ft: f64,
    pub track_deg: f64,
    pub gs_kn: f64,
    pub vs_fpm: f64,

    #[serde(default)]
    pub report_interval_secs: Option<f64>, // contact report period, every step if not set
    #[serde(default)]
    pub remove_at_secs: Option<f64>,       // contact is dropped from the feed at this time
}

#[derive(Deserialize,Serialize,Debug,Clone)]
#[serde(default)]
pub struct Scenario {
    pub duration_secs: f64,
    pub step_secs: f64,
    pub mode: OperatingMode,
    pub own: VehicleSpec,
    pub own_radar_alt_ft: Option<f64>, // initial radar altitude, terrain elevation stays constant
    pub follow_ra: bool,
    pub intruders: Vec<VehicleSpec>,
}

impl Default for Scenario {
    fn default()->Self {
        Scenario {
            duration_secs: 60.0,
            step_secs: 0.5,
            mode: OperatingMode::TrafficAndResolution,
            own: VehicleSpec {
                id: "own".to_string(),
                lat: 0.0, lon: 0.0, alt_ft: 10000.0, track_deg: 0.0, gs_kn: 250.0, vs_fpm: 0.0,
                report_interval_secs: None, remove_at_secs: None
            },
            own_radar_alt_ft: None,
            follow_ra: false,
            intruders: Vec::new(),
        }
    }
}

impl Scenario {
    pub fn check (&self)->Result<()> {
        if !(self.step_secs > 0.0) { return Err( scenario_error!("step_secs has to be > 0: {}", self.step_secs)) }
        if !(self.duration_secs >= 0.0) { return Err( scenario_error!("invalid duration_secs: {}", self.duration_secs)) }

        let mut ids = HashSet::new();
        for v in &self.intruders {
            if !ids.insert( v.id.as_str()) { return Err( scenario_error!("duplicated intruder id {}", v.id)) }
            if v.report_interval_secs.is_some_and( |dt| !(dt > 0.0)) {
                return Err( scenario_error!("invalid report interval for {}", v.id))
            }
        }
        Ok(())
    }
}

pub fn parse_scenario (src: &str)->Result<Scenario> {
    let scenario: Scenario = ron::de::from_str( src)?;
    scenario.check()?;
    Ok(scenario)
}

pub fn load_scenario<P: AsRef<Path>> (path: P)->Result<Scenario> {
    let src = fs::read_to_string( path)?;
    parse_scenario( &src)
}

/// what happened during a scenario run
#[derive(Debug,Clone,Default,Serialize)]
pub struct ScenarioSummary {
    pub steps: usize,
    pub cycles: u64,
    pub ra_issued: usize,
    pub ra_updated: usize,
    pub ra_canceled: usize,
    pub reversals: usize,
    pub max_levels: Vec<(String,AlertLevel)>, // per intruder, in scenario order
    pub min_distance: Vec<(String,f64,f64)>,  // per intruder: horizontal (m) and vertical (m) separation at closest horizontal approach
    pub final_own_alt_ft: f64,
}

impl ScenarioSummary {
    pub fn max_level (&self, id: &str)->Option<AlertLevel> {
        self.max_levels.iter().find( |(i,_)| i == id).map( |(_,l)| *l)
    }
}

/// simulated straight line mover
#[derive(Debug,Clone)]
struct Mover {
    lat: f64,
    lon: f64,
    alt: f64,   // m
    track: f64, // degrees
    gs: f64,    // m/s
    vs: f64,    // m/s
}

impl Mover {
    fn new (spec: &VehicleSpec)->Self {
        Mover {
            lat: spec.lat, lon: spec.lon, alt: ft_to_m( spec.alt_ft),
            track: spec.track_deg, gs: kn_to_mps( spec.gs_kn), vs: fpm_to_mps( spec.vs_fpm)
        }
    }

    fn advance (&mut self, dt: f64) {
        let trk = self.track.to_radians();
        let dn = self.gs * trk.cos() * dt;
        let de = self.gs * trk.sin() * dt;
        self.lat += (dn / MEAN_EARTH_RADIUS).to_degrees();
        self.lon += (de / (MEAN_EARTH_RADIUS * self.lat.to_radians().cos().max(1e-6))).to_degrees();
        self.alt += self.vs * dt;
    }

    fn kinematics (&self)->KinematicReport {
        KinematicReport::new( self.lat, self.lon, meters( self.alt), Some(self.track), meters_per_second( self.gs), meters_per_second( self.vs))
    }

    /// (horizontal, vertical) distance in meters
    fn distance_to (&self, other: &Mover)->(f64,f64) {
        let dn = (other.lat - self.lat).to_radians() * MEAN_EARTH_RADIUS;
        let de = (other.lon - self.lon).to_radians() * MEAN_EARTH_RADIUS * self.lat.to_radians().cos();
        (dn.hypot(de), (other.alt - self.alt).abs())
    }
}

#[derive(Default)]
struct EventStats {
    issued: usize,
    updated: usize,
    canceled: usize,
    reversals: usize,
    last_sense: Option<Sense>,
}

/// run the scenario with a new [`Tcas`] instance. All events are passed on to `action`
pub fn run_scenario<A> (scenario: &Scenario, config: TcasConfig, action: A)->Result<ScenarioSummary>
    where A: TcasEventAction + 'static
{
    scenario.check()?;
    config.check()?;

    let ra_config = config.ra.clone();
    let mut tcas = Tcas::new( config, DefaultTcasPolicy::new( &ra_config));

    let stats = Rc::new( RefCell::new( EventStats::default()));
    {
        let stats = stats.clone();
        tcas.add_action( move |e: &TcasEvent| {
            let mut stats = stats.borrow_mut();
            match e {
                TcasEvent::RaIssued(ra) => {
                    stats.issued += 1;
                    stats.last_sense = ra.sense();
                }
                TcasEvent::RaUpdated(ra) => {
                    stats.updated += 1;
                    if ra.sense().is_some() && ra.sense() != stats.last_sense { stats.reversals += 1; }
                    stats.last_sense = ra.sense();
                }
                TcasEvent::RaCanceled => {
                    stats.canceled += 1;
                    stats.last_sense = None;
                }
                _ => {}
            }
        });
    }
    tcas.add_action( action);
    tcas.set_operating_mode( scenario.mode);

    let mut own = Mover::new( &scenario.own);
    let nominal_own_vs = own.vs;
    let terrain = scenario.own_radar_alt_ft.map( |ra| own.alt - ft_to_m( ra));

    let mut intruders: Vec<(Mover,f64,bool)> = scenario.intruders.iter().map( |s| (Mover::new(s), f64::NEG_INFINITY, true)).collect();
    let mut max_levels: Vec<(String,AlertLevel)> = scenario.intruders.iter().map( |s| (s.id.clone(), AlertLevel::None)).collect();
    let mut min_distance: Vec<(String,f64,f64)> = scenario.intruders.iter().map( |s| (s.id.clone(), f64::INFINITY, f64::NAN)).collect();

    let accel = g_to_mps2( ra_config.initial_accel_g);
    let response_time = ra_config.initial_response_secs;
    let mut ra_since: Option<f64> = None;

    let t0 = Instant::now();
    let n_steps = (scenario.duration_secs / scenario.step_secs).floor() as usize;
    let mut t = 0.0;

    for step in 0..=n_steps {
        if step > 0 {
            own.advance( scenario.step_secs);
            for (m,_,_) in intruders.iter_mut() { m.advance( scenario.step_secs); }
            t = step as f64 * scenario.step_secs;
        }

        let radar_alt = terrain.map( |elev| meters( own.alt - elev));
        tcas.set_own_report( OwnReport::new( own.kinematics(), radar_alt, false, t));

        for (i,spec) in scenario.intruders.iter().enumerate() {
            let (mover, last_report, active) = &mut intruders[i];
            if !*active { continue }

            if spec.remove_at_secs.is_some_and( |tr| t >= tr) {
                tcas.remove_contact( &spec.id);
                *active = false;
                continue
            }

            let due = spec.report_interval_secs.is_none_or( |dt| t - *last_report >= dt - 1e-9);
            if due {
                tcas.report_contact( &spec.id, ContactReport::new( mover.kinematics(), t));
                *last_report = t;
            }

            let (dh,dv) = own.distance_to( mover);
            if dh < min_distance[i].1 {
                min_distance[i].1 = dh;
                min_distance[i].2 = dv;
            }
        }

        tcas.update_at( t, t0 + Duration::from_secs_f64( t));

        for (i,spec) in scenario.intruders.iter().enumerate() {
            if let Some(intruder) = tcas.intruder( &spec.id) {
                if intruder.alert_level() > max_levels[i].1 { max_levels[i].1 = intruder.alert_level(); }
            }
        }

        if scenario.follow_ra {
            follow_advisory( &tcas, &mut own, &mut ra_since, t, nominal_own_vs, response_time, accel * scenario.step_secs);
        }
    }

    let stats = stats.borrow();
    let summary = ScenarioSummary {
        steps: n_steps + 1,
        cycles: tcas.num_cycles(),
        ra_issued: stats.issued,
        ra_updated: stats.updated,
        ra_canceled: stats.canceled,
        reversals: stats.reversals,
        max_levels,
        min_distance,
        final_own_alt_ft: m_to_ft( own.alt),
    };
    info!("scenario done: {} cycles, RA issued: {}, updated: {}, canceled: {}, reversals: {}",
          summary.cycles, summary.ra_issued, summary.ra_updated, summary.ra_canceled, summary.reversals);

    Ok(summary)
}

/// change the own vertical speed towards the advisory bound (or back to nominal without advisory) by at most `dv`
fn follow_advisory (tcas: &Tcas, own: &mut Mover, ra_since: &mut Option<f64>, t: f64, nominal_vs: f64, response_time: f64, dv: f64) {
    let target = match tcas.advisory() {
        Some(ra) => {
            let since = *ra_since.get_or_insert( t);
            if t - since < response_time { return }

            match ra.sense() {
                Some(Sense::Up) => own.vs.max( ra.min_vertical_speed),
                Some(Sense::Down) => own.vs.min( ra.max_vertical_speed),
                None => own.vs
            }
        }
        None => {
            *ra_since = None;
            nominal_vs
        }
    };

    let d = target - own.vs;
    own.vs += d.clamp( -dv, dv);
}

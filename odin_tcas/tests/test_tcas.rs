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
#![allow(unused)]

use std::{cell::RefCell, rc::Rc, time::{Duration, Instant}};
use odin_tcas::{
    event_channel, kinematic::LocalFrame, resolution::{sense::Sense, RaFlags}, tcas::RateLimiter, units::*,
    AlertCounts, AlertLevel, ContactReport, KinematicReport, OperatingMode, OwnReport, Tcas, TcasConfig, TcasEvent, TcasPolicy,
};

/// tests for the update scheduler
/// run with "cargo test test_tcas -- --nocapture"

const ALT_FT: f64 = 12000.0;
const GS_KN: f64 = 250.0;

fn test_config ()->TcasConfig {
    TcasConfig { max_real_update_freq: 0.0, max_sim_update_freq: 0.0, ..TcasConfig::default() }
}

fn own_report (t: f64)->OwnReport {
    OwnReport::new( KinematicReport::new( 0.0, 0.0, feet( ALT_FT), Some(90.0), knots(GS_KN), feet_per_minute(0.0)), None, false, t)
}

fn contact (x: f64, y: f64, rel_alt_ft: f64, track: f64, gs_kn: f64, t: f64)->ContactReport {
    let (lat,lon) = LocalFrame::new( 0.0, 0.0).to_geo( x, y);
    ContactReport::new( KinematicReport::new( lat, lon, feet( ALT_FT + rel_alt_ft), Some(track), knots(gs_kn), feet_per_minute(0.0)), t)
}

fn head_on (x: f64, rel_alt_ft: f64)->ContactReport { contact( x, 0.0, rel_alt_ft, 270.0, GS_KN, 0.0) }

fn collect_events<P: TcasPolicy> (tcas: &mut Tcas<P>)->Rc<RefCell<Vec<TcasEvent>>> {
    let events = Rc::new( RefCell::new( Vec::new()));
    let ev = events.clone();
    tcas.add_action( move |e: &TcasEvent| ev.borrow_mut().push( e.clone()));
    events
}

fn count<F: Fn(&TcasEvent)->bool> (events: &Rc<RefCell<Vec<TcasEvent>>>, f: F)->usize {
    events.borrow().iter().filter( |e| f(*e)).count()
}

#[test]
fn test_tcas_colocated () {
    let mut tcas = Tcas::with_config( test_config());
    let events = collect_events( &mut tcas);

    tcas.set_own_report( own_report(0.0));
    tcas.report_contact( "N1", contact( 0.0, 0.0, 0.0, 90.0, GS_KN, 0.0));
    assert!( tcas.update( 0.0));

    let intruder = tcas.intruder("N1").unwrap();
    println!("{intruder}");
    assert_eq!( intruder.ra_prediction().tca(), 0.0);
    assert_eq!( intruder.ra_prediction().norm(), 0.0);
    assert_eq!( intruder.alert_level(), AlertLevel::Resolution);

    // no time to maneuver -> preventive advisory that does not reach ALIM
    let ra = tcas.advisory().unwrap();
    println!("{ra}");
    assert_eq!( ra.sense(), Some(Sense::Up));
    assert_eq!( ra.min_vertical_speed, 0.0);
    assert!( ra.flags.contains( RaFlags::DO_NOT_DESCEND | RaFlags::INITIAL));
    assert!( !ra.flags.intersects( RaFlags::CLIMB | RaFlags::CORRECTIVE));
    assert!( !tcas.ra_engine().reaches_target());

    assert_eq!( count( &events, |e| matches!( e, TcasEvent::RaIssued(_))), 1);
    assert_eq!( tcas.alert_counts(), AlertCounts { proximity: 0, traffic: 0, resolution: 1 });

    // alert level events come before the advisory
    let evs = events.borrow();
    let i_level = evs.iter().position( |e| matches!( e, TcasEvent::AlertLevelChanged{..})).unwrap();
    let i_ra = evs.iter().position( |e| matches!( e, TcasEvent::RaIssued(_))).unwrap();
    assert!( i_level < i_ra);
}

#[test]
fn test_tcas_invalid_contact () {
    let mut tcas = Tcas::with_config( test_config());

    tcas.set_own_report( own_report(0.0));
    tcas.report_contact( "slow", contact( 1000.0, 0.0, 0.0, 270.0, 5.0, 0.0));
    tcas.report_contact( "N1", head_on( 6430.0, -200.0));
    tcas.report_contact( "no-track", ContactReport::new( KinematicReport::new( 0.0, 0.01, feet(ALT_FT), None, knots(GS_KN), feet_per_minute(0.0)), 0.0));
    assert!( tcas.update( 0.0));

    let ids: Vec<&str> = tcas.intruders().iter().map( |i| i.id().as_str()).collect();
    println!("sorted: {ids:?}");
    assert_eq!( ids, vec!["N1", "slow", "no-track"]);

    for id in ["slow", "no-track"] {
        let intruder = tcas.intruder( id).unwrap();
        assert!( !intruder.is_valid());
        assert!( !intruder.ra_prediction().is_valid() && intruder.ra_prediction().norm().is_nan());
        assert_eq!( intruder.alert_level(), AlertLevel::None);
    }
    assert_eq!( tcas.alert_counts().resolution, 1);
    assert_eq!( tcas.resolution_intruders().len(), 1);
}

#[test]
fn test_tcas_sort_and_truncate () {
    let mut config = test_config();
    config.max_intruder_count = 2;
    let mut tcas = Tcas::with_config( config);

    tcas.set_own_report( own_report(0.0));
    tcas.report_contact( "far", head_on( 20000.0, 0.0));
    tcas.report_contact( "slow", contact( 1000.0, 0.0, 0.0, 270.0, 5.0, 0.0));
    tcas.report_contact( "high", head_on( 3000.0, 500.0));
    tcas.report_contact( "close", head_on( 6430.0, -200.0));
    assert!( tcas.update( 0.0));

    let ids: Vec<&str> = tcas.intruders().iter().map( |i| i.id().as_str()).collect();
    println!("sorted: {ids:?}");
    assert_eq!( ids, vec!["close", "high", "far", "slow"]);

    let filtered = tcas.filtered_intruders();
    assert_eq!( filtered.len(), 2);
    assert!( filtered.iter().all( |f| tcas.intruders().iter().any( |i| i.id() == f.id())));
    assert_eq!( tcas.alert_counts().resolution, 2);

    // with a single slot "high" is not evaluated anymore
    let mut config = test_config();
    config.max_intruder_count = 1;
    let mut tcas = Tcas::with_config( config);
    tcas.set_own_report( own_report(0.0));
    tcas.report_contact( "high", head_on( 3000.0, 500.0));
    tcas.report_contact( "close", head_on( 6430.0, -200.0));
    assert!( tcas.update( 0.0));

    assert_eq!( tcas.filtered_intruders().len(), 1);
    assert_eq!( tcas.intruder("high").unwrap().alert_level(), AlertLevel::None);
    assert_eq!( tcas.intruder("close").unwrap().alert_level(), AlertLevel::Resolution);
    assert_eq!( tcas.resolution_intruders().len(), 1);
}

#[test]
fn test_tcas_multiple_ra_intruders () {
    let mut tcas = Tcas::with_config( test_config());

    tcas.set_own_report( own_report(0.0));
    tcas.report_contact( "close", head_on( 6430.0, -200.0));
    tcas.report_contact( "closer", head_on( 3000.0, -500.0));
    assert!( tcas.update( 0.0));

    let ra = tcas.advisory().unwrap();
    println!("{ra}");
    let ids: Vec<&str> = ra.intruders.iter().map( |id| id.as_str()).collect();
    assert_eq!( ids, vec!["closer", "close"]); // by increasing TCA
}

#[test]
fn test_tcas_idempotence () {
    let mut tcas = Tcas::with_config( test_config());
    let events = collect_events( &mut tcas);

    tcas.set_own_report( own_report(0.0));
    tcas.report_contact( "N1", head_on( 6430.0, -200.0));
    tcas.report_contact( "N2", contact( 0.0, nm_to_m(4.0), 0.0, 90.0, GS_KN, 0.0));
    assert!( tcas.update( 0.0));
    assert!( !events.borrow().is_empty());

    let ra1 = tcas.advisory().unwrap().clone();
    let levels1: Vec<AlertLevel> = tcas.intruders().iter().map( |i| i.alert_level()).collect();
    events.borrow_mut().clear();

    assert!( tcas.update( 0.0));
    assert!( events.borrow().is_empty());

    let ra2 = tcas.advisory().unwrap();
    assert_eq!( ra1.flags, ra2.flags);
    assert_eq!( ra1.min_vertical_speed.to_bits(), ra2.min_vertical_speed.to_bits());
    assert_eq!( ra1.max_vertical_speed.to_bits(), ra2.max_vertical_speed.to_bits());
    assert_eq!( ra1.intruders, ra2.intruders);
    let levels2: Vec<AlertLevel> = tcas.intruders().iter().map( |i| i.alert_level()).collect();
    assert_eq!( levels1, levels2);

    // with the default rate limits the second call does not even run
    let mut tcas = Tcas::with_config( TcasConfig::default());
    tcas.set_own_report( own_report(0.0));
    tcas.report_contact( "N1", head_on( 6430.0, -200.0));
    assert!( tcas.update( 0.0));
    assert!( !tcas.update( 0.0));
    assert_eq!( tcas.num_cycles(), 1);
}

#[test]
fn test_tcas_cancel () {
    let mut tcas = Tcas::with_config( test_config());
    let events = collect_events( &mut tcas);

    tcas.set_own_report( own_report(0.0));
    tcas.report_contact( "N1", head_on( 6430.0, -200.0));
    assert!( tcas.update( 0.0));
    assert_eq!( tcas.advisory().unwrap().sense(), Some(Sense::Up));

    // intruder climbs through our altitude -> use up the reversal
    let mut report = head_on( 4000.0, -200.0);
    report.kinematics.vertical_speed = feet_per_minute( 3000.0);
    report.last_contact = 0.5;
    tcas.set_own_report( own_report(0.5));
    tcas.report_contact( "N1", report);
    assert!( tcas.update( 0.5));
    assert_eq!( tcas.advisory().unwrap().sense(), Some(Sense::Down));
    assert!( !tcas.ra_engine().is_reversal_available());

    assert!( tcas.remove_contact( "N1"));
    assert!( !tcas.remove_contact( "N1"));
    assert!( tcas.intruders().is_empty());

    tcas.set_own_report( own_report(1.0));
    assert!( tcas.update( 1.0));
    tcas.set_own_report( own_report(1.5));
    assert!( tcas.update( 1.5));

    assert_eq!( count( &events, |e| matches!( e, TcasEvent::RaCanceled)), 1);
    assert!( tcas.advisory().is_none());
    let engine = tcas.ra_engine();
    assert!( !engine.is_active());
    assert!( engine.advisory().min_vertical_speed.is_nan() && engine.advisory().max_vertical_speed.is_nan());
    assert!( engine.advisory().flags.is_empty() && engine.advisory().intruders.is_empty());
    assert!( engine.is_reversal_available()); // reset by the cancel
    assert_eq!( tcas.alert_counts(), AlertCounts::default());
}

#[test]
fn test_tcas_formation () {
    let mut tcas = Tcas::with_config( test_config());
    let events = collect_events( &mut tcas);

    // intruder 1.5nm behind us on the same track and speed, both reported once at t=0
    tcas.set_own_report( own_report(0.0));
    tcas.report_contact( "N1", contact( -nm_to_m(1.5), 0.0, 0.0, 90.0, GS_KN, 0.0));

    for t in [0.0, 10.0] {
        assert!( tcas.update( t));
        let own = tcas.own_vehicle();
        let intruder = tcas.intruder("N1").unwrap();
        println!("t={t}: own at {:?}, intruder rel {:?}", own.frame().origin(), intruder.relative_position());

        assert!( (intruder.relative_position().x + nm_to_m(1.5)).abs() < 1e-3);
        assert!( (intruder.horizontal_separation() - nm_to_m(1.5)).abs() < 1e-3);
        assert!( intruder.relative_altitude().abs() < 1e-6);
        assert_eq!( intruder.alert_level(), AlertLevel::Proximity);
    }

    // own vehicle moved with us, the frame moved along
    let (_, lon) = tcas.own_vehicle().frame().origin();
    assert!( lon > 0.0);
    assert!( tcas.advisory().is_none());
    assert_eq!( count( &events, |e| matches!( e, TcasEvent::RaIssued(_))), 0);
    assert_eq!( tcas.alert_counts(), AlertCounts { proximity: 1, traffic: 0, resolution: 0 });
}

#[test]
fn test_tcas_standby () {
    let mut tcas = Tcas::with_config( test_config());
    let events = collect_events( &mut tcas);

    tcas.set_own_report( own_report(0.0));
    tcas.report_contact( "N1", head_on( 6430.0, -200.0));
    assert!( tcas.update( 0.0));
    events.borrow_mut().clear();

    tcas.set_operating_mode( OperatingMode::Standby);
    {
        let evs = events.borrow();
        println!("standby events: {evs:?}");
        assert_eq!( evs.len(), 4);
        assert!( matches!( evs[0], TcasEvent::OperatingModeChanged( OperatingMode::Standby)));
        assert!( matches!( evs[1], TcasEvent::AlertLevelChanged { previous: AlertLevel::Resolution, current: AlertLevel::None, .. }));
        assert!( matches!( evs[2], TcasEvent::AlertCountsChanged(_)));
        assert!( matches!( evs[3], TcasEvent::RaCanceled));
    }
    assert!( tcas.advisory().is_none());
    assert!( !tcas.update( 0.5));
    assert_eq!( tcas.intruder("N1").unwrap().alert_level(), AlertLevel::None);

    tcas.set_operating_mode( OperatingMode::TrafficOnly);
    assert!( tcas.update( 1.0));
    assert_eq!( tcas.intruder("N1").unwrap().alert_level(), AlertLevel::Traffic);
    assert!( tcas.advisory().is_none());
}

#[test]
fn test_tcas_rate_limiter () {
    let t0 = Instant::now();
    let at = |secs: f64| t0 + Duration::from_secs_f64( secs);

    let mut limiter = RateLimiter::new( 10.0, 2.0);
    assert!( limiter.try_pass( 0.0, at(0.0)));
    assert!( !limiter.try_pass( 0.2, at(0.2)));  // sim interval
    assert!( limiter.try_pass( 0.5, at(0.5)));
    assert!( !limiter.try_pass( 1.0, at(0.55))); // real interval
    assert!( limiter.try_pass( 1.0, at(0.7)));

    let mut limiter = RateLimiter::new( 0.0, 0.0);
    assert!( limiter.try_pass( 0.0, at(0.0)));
    assert!( limiter.try_pass( 0.0, at(0.0)));

    // only the sim time cap
    let mut tcas = Tcas::with_config( TcasConfig { max_real_update_freq: 0.0, ..TcasConfig::default() });
    tcas.set_own_report( own_report(0.0));
    let n = (0..20).filter( |i| tcas.update_at( *i as f64 * 0.1, at(0.0))).count();
    assert_eq!( n, 4); // 0.0, 0.5, 1.0, 1.5
}

#[test]
fn test_tcas_event_channel () {
    let mut tcas = Tcas::with_config( test_config());
    let (action, rx) = event_channel();
    tcas.add_action( action);

    tcas.set_own_report( own_report(0.0));
    tcas.report_contact( "N1", head_on( 6430.0, -200.0));
    assert!( tcas.update( 0.0));
    assert_eq!( tcas.num_actions(), 1);

    let mut received = Vec::new();
    while let Ok(Some(e)) = rx.try_recv() {
        received.push( e);
    }
    println!("received: {received:?}");
    assert!( received.iter().any( |e| matches!( e, TcasEvent::RaIssued(_))));
    assert!( matches!( received.last(), Some(TcasEvent::RaIssued(_))));

    // dropped receivers remove the action but do not affect the update cycle
    drop( rx);
    tcas.report_contact( "N1", head_on( 20000.0, -200.0));
    assert!( tcas.update( 1.0));
    assert!( tcas.advisory().is_none());
    assert_eq!( tcas.num_actions(), 0);
}

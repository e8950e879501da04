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

use std::{cell::RefCell, rc::Rc};
use odin_tcas::{
    scenario::{load_scenario, parse_scenario, run_scenario, Scenario},
    units::ft_to_m, AlertLevel, OdinTcasError, OperatingMode, TcasConfig, TcasEvent,
};

/// tests for simulated encounters
/// run with "cargo test test_scenario -- --nocapture"

#[test]
fn test_headon_scenario () {
    let path = concat!( env!("CARGO_MANIFEST_DIR"), "/configs/headon.ron");
    let scenario = load_scenario( path).unwrap();
    assert_eq!( scenario.intruders.len(), 2);

    let events = Rc::new( RefCell::new( Vec::new()));
    let ev = events.clone();
    let summary = run_scenario( &scenario, TcasConfig::default(), move |e: &TcasEvent| ev.borrow_mut().push( e.clone())).unwrap();
    println!("{summary:#?}");

    assert_eq!( summary.steps, 181);
    assert_eq!( summary.cycles, summary.steps as u64);

    assert_eq!( summary.max_level("N123"), Some(AlertLevel::Resolution));
    assert_eq!( summary.max_level("slow"), Some(AlertLevel::None));
    assert_eq!( summary.max_level("unknown"), None);

    assert!( summary.ra_issued >= 1);
    assert!( summary.ra_canceled >= 1);
    assert!( summary.reversals <= summary.ra_issued);

    // the user action sees the same advisories
    let events = events.borrow();
    let n_issued = events.iter().filter( |e| matches!( e, TcasEvent::RaIssued(_))).count();
    assert_eq!( n_issued, summary.ra_issued);

    // we were below the intruder and followed the advisory down
    assert!( summary.final_own_alt_ft < 10000.0);
    let (_,dh,dv) = &summary.min_distance[0];
    println!("closest approach: {dh:.0}m horizontal, {dv:.0}m vertical");
    assert!( *dv > ft_to_m( 200.0));
}

#[test]
fn test_traffic_only_scenario () {
    let path = concat!( env!("CARGO_MANIFEST_DIR"), "/configs/headon.ron");
    let mut scenario = load_scenario( path).unwrap();
    scenario.mode = OperatingMode::TrafficOnly;

    let summary = run_scenario( &scenario, TcasConfig::default(), |_: &TcasEvent| {}).unwrap();
    println!("{summary:#?}");

    assert_eq!( summary.max_level("N123"), Some(AlertLevel::Traffic));
    assert_eq!( summary.ra_issued, 0);
    assert!( (summary.final_own_alt_ft - 10000.0).abs() < 1e-6);
}

#[test]
fn test_removed_contact () {
    let src = r#"
        Scenario(
            duration_secs: 40.0,
            follow_ra: false,
            own: VehicleSpec( id: "own", lat: 0.0, lon: 0.0, alt_ft: 12000.0, track_deg: 90.0, gs_kn: 250.0, vs_fpm: 0.0 ),
            intruders: [
                VehicleSpec( id: "N1", lat: 0.0, lon: 0.0578, alt_ft: 11800.0, track_deg: 270.0, gs_kn: 250.0, vs_fpm: 0.0,
                             remove_at_secs: Some(30.0) ),
            ]
        )
    "#;
    let scenario = parse_scenario( src).unwrap();
    assert_eq!( scenario.step_secs, 0.5);

    let summary = run_scenario( &scenario, TcasConfig::default(), |_: &TcasEvent| {}).unwrap();
    println!("{summary:#?}");

    assert_eq!( summary.max_level("N1"), Some(AlertLevel::Resolution));
    assert_eq!( summary.ra_issued, 1);
    assert_eq!( summary.ra_canceled, 1);
}

#[test]
fn test_invalid_scenarios () {
    let mut scenario = Scenario::default();
    assert!( scenario.check().is_ok());

    scenario.step_secs = 0.0;
    assert!( matches!( scenario.check(), Err(OdinTcasError::ScenarioError(_))));

    let src = r#"
        Scenario(
            own: VehicleSpec( id: "own", lat: 0.0, lon: 0.0, alt_ft: 12000.0, track_deg: 90.0, gs_kn: 250.0, vs_fpm: 0.0 ),
            intruders: [
                VehicleSpec( id: "N1", lat: 0.0, lon: 0.1, alt_ft: 12000.0, track_deg: 270.0, gs_kn: 250.0, vs_fpm: 0.0 ),
                VehicleSpec( id: "N1", lat: 0.1, lon: 0.0, alt_ft: 12000.0, track_deg: 180.0, gs_kn: 250.0, vs_fpm: 0.0 ),
            ]
        )
    "#;
    let res = parse_scenario( src);
    println!("{res:?}");
    assert!( matches!( res, Err(OdinTcasError::ScenarioError(_))));

    let res = parse_scenario( "Scenario( duration_secs: \"long\" )");
    assert!( matches!( res, Err(OdinTcasError::ConfigError(_))));

    assert!( matches!( load_scenario( "no/such/scenario.ron"), Err(OdinTcasError::IOError(_))));
}

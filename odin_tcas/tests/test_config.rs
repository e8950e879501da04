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

use odin_tcas::{load_config, parse_config, OperatingMode, TcasConfig};

/// tests for RON configuration parsing
/// run with "cargo test test_config -- --nocapture"

#[test]
fn test_default_config_file () {
    let path = concat!( env!("CARGO_MANIFEST_DIR"), "/configs/tcas.ron");
    let config = load_config( path).unwrap();
    println!("{config:#?}");

    let default = TcasConfig::default();
    assert_eq!( config.initial_mode, default.initial_mode);
    assert_eq!( config.max_intruder_count, default.max_intruder_count);
    assert_eq!( config.max_sim_update_freq, default.max_sim_update_freq);
    assert_eq!( config.ra.increase_fpm, default.ra.increase_fpm);
    assert_eq!( config.ra.increase_descend_inhibit_radar_alt_ft, Some(1550.0));
    assert_eq!( config.sensitivity_levels.len(), default.sensitivity_levels.len());
}

#[test]
fn test_partial_config () {
    let src = r#"
        TcasConfig(
            initial_mode: TrafficOnly,
            max_intruder_count: 5,
            ra: RaConfig( climb_fpm: 1000.0, descend_inhibit_radar_alt_ft: None ),
        )
    "#;

    let config = parse_config( src).unwrap();
    println!("{config:?}");
    assert_eq!( config.initial_mode, OperatingMode::TrafficOnly);
    assert_eq!( config.max_intruder_count, 5);
    assert_eq!( config.max_real_update_freq, 10.0);
    assert_eq!( config.ra.climb_fpm, 1000.0);
    assert_eq!( config.ra.increase_fpm, 2500.0);
    assert_eq!( config.ra.descend_inhibit_radar_alt_ft, None);
    assert_eq!( config.sensitivity_levels.len(), 7);
}

#[test]
fn test_invalid_config () {
    assert!( parse_config( "TcasConfig( max_intruder_count: 0 )").is_err());
    assert!( parse_config( "TcasConfig( ra: RaConfig( climb_fpm: 3000.0, increase_fpm: 2500.0 ))").is_err());
    assert!( parse_config( "TcasConfig( sensitivity_levels: [] )").is_err());
    assert!( parse_config( "TcasConfig( max_intruder_count: \"many\" )").is_err());
    assert!( load_config( "no/such/config.ron").is_err());
}

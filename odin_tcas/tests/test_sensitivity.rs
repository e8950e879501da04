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

use odin_tcas::sensitivity::{default_sensitivity_levels, SensitivityLevelSpec, SensitivityProvider};
use odin_tcas::units::{ft_to_m, nm_to_m};

/// tests for sensitivity level selection
/// run with "cargo test test_sensitivity -- --nocapture"

#[test]
fn test_sensitivity_levels () {
    let mut provider = SensitivityProvider::default();
    let nan = f64::NAN;

    // (alt ft, radar alt ft, on ground) -> expected level index
    let cases: [(f64,f64,bool,usize);9] = [
        (  500.0,   400.0, true,  0),
        ( 3000.0,   400.0, false, 0),
        ( 3000.0,  1500.0, false, 1),
        ( 3000.0,  3000.0, false, 2),
        ( 3000.0,    nan,  false, 2),
        ( 8000.0,    nan,  false, 3),
        (12000.0,    nan,  false, 4),
        (30000.0,    nan,  false, 5),
        (45000.0,    nan,  false, 6),
    ];

    for (alt_ft,radar_alt_ft,on_ground,expected) in cases {
        let idx = provider.level_index( ft_to_m(alt_ft), ft_to_m(radar_alt_ft), on_ground);
        println!("  alt: {alt_ft}ft, radar alt: {radar_alt_ft}ft, on ground: {on_ground} -> {idx}");
        assert_eq!( idx, expected);

        let sens = provider.update( ft_to_m(alt_ft), ft_to_m(radar_alt_ft), on_ground);
        assert_eq!( sens.index, expected);
    }
}

#[test]
fn test_sensitivity_parameters () {
    let mut provider = SensitivityProvider::default();

    let sl2 = *provider.update( ft_to_m(500.0), ft_to_m(400.0), false);
    assert_eq!( sl2.level, 2);
    assert!( !sl2.has_resolution());
    assert!( !sl2.resolution.is_defined());
    assert!( sl2.traffic.is_defined());

    let sl5 = *provider.update( ft_to_m(8000.0), f64::NAN, false);
    println!("SL5: {sl5:?}");
    assert_eq!( sl5.level, 5);
    assert!( sl5.has_resolution());
    assert_eq!( sl5.traffic.lookahead, 40.0);
    assert!( (sl5.traffic.radius - nm_to_m(0.75)).abs() < 1e-9);
    assert!( (sl5.resolution.half_height - ft_to_m(600.0)).abs() < 1e-9);
    assert!( (sl5.alim - ft_to_m(350.0)).abs() < 1e-9);
    assert!( (sl5.proximity.radius - nm_to_m(6.0)).abs() < 1e-9);
    assert!( (sl5.proximity.half_height - ft_to_m(1200.0)).abs() < 1e-9);
}

#[test]
fn test_custom_sensitivity_table () {
    let mut levels = default_sensitivity_levels();
    levels.truncate(3);
    levels[2].alim_ft = 500.0;

    let mut provider = SensitivityProvider::new( levels);
    assert_eq!( provider.levels().len(), 3);

    // above all ceilings we use the last level
    let sens = provider.update( ft_to_m(35000.0), f64::NAN, false);
    assert_eq!( sens.index, 2);
    assert_eq!( sens.level, 4);
    assert!( (sens.alim - ft_to_m(500.0)).abs() < 1e-9);
}

#[test]
#[should_panic]
fn test_empty_sensitivity_table () {
    SensitivityProvider::new( Vec::new());
}

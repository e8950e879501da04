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

//! traffic alert and collision avoidance core: tracks traffic contacts relative to the own vehicle,
//! predicts closest approach, classifies threats (PA/TA/RA) and computes vertical resolution advisories.
//!
//! The [`Tcas`] update scheduler is the main entry point. It is single threaded and driven by
//! simulation clock ticks, notifications go to registered [`TcasEventAction`]s.

pub mod errors;
pub mod units;
pub mod cartesian3;
pub mod config;
pub mod kinematic;
pub mod own_vehicle;
pub mod intruder;
pub mod tca;
pub mod sensitivity;
pub mod policy;
pub mod alert;
pub mod resolution;
pub mod events;
pub mod tcas;
pub mod scenario;

pub use errors::{OdinTcasError, Result};
pub use config::{load_config, parse_config, RaConfig, TcasConfig};
pub use kinematic::{ContactReport, KinematicReport, OwnReport};
pub use intruder::{ContactId, Intruder};
pub use alert::{AlertCounts, AlertLevel};
pub use policy::{DefaultTcasPolicy, OperatingMode, TcasPolicy};
pub use resolution::{RaFlags, ResolutionAdvisory};
pub use events::{event_channel, TcasEvent, TcasEventAction};
pub use tcas::Tcas;

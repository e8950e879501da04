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

//! notifications emitted by the update cycle. Events are queued while a cycle executes and then
//! delivered synchronously to all registered actions, alert level changes before advisory changes.

use serde::Serialize;
use tracing::warn;

use crate::alert::{AlertCounts, AlertLevel};
use crate::errors::{op_failed, Result};
use crate::intruder::ContactId;
use crate::policy::OperatingMode;
use crate::resolution::ResolutionAdvisory;

#[derive(Debug,Clone,Serialize)]
pub enum TcasEvent {
    OperatingModeChanged(OperatingMode),
    AlertLevelChanged { id: ContactId, previous: AlertLevel, current: AlertLevel },
    AlertCountsChanged(AlertCounts),
    RaIssued(ResolutionAdvisory),
    RaUpdated(ResolutionAdvisory),
    RaCanceled,
}

impl TcasEvent {
    /// delivery rank within a cycle
    fn rank (&self)->u8 {
        match self {
            TcasEvent::OperatingModeChanged(_) => 0,
            TcasEvent::AlertLevelChanged{..} => 1,
            TcasEvent::AlertCountsChanged(_) => 2,
            TcasEvent::RaIssued(_) | TcasEvent::RaUpdated(_) | TcasEvent::RaCanceled => 3,
        }
    }
}

/// something that gets executed for each emitted event. Implemented for closures so that
/// `tcas.add_action( |e: &TcasEvent| {..})` works
pub trait TcasEventAction {
    fn execute (&mut self, event: &TcasEvent)->Result<()>;
}

impl<F> TcasEventAction for F where F: FnMut(&TcasEvent) {
    fn execute (&mut self, event: &TcasEvent)->Result<()> {
        self(event);
        Ok(())
    }
}

/// action that forwards events to a kanal channel, e.g. to be processed by another thread
pub struct ChannelAction {
    tx: kanal::Sender<TcasEvent>
}

impl ChannelAction {
    pub fn new (tx: kanal::Sender<TcasEvent>)->Self { ChannelAction { tx } }
}

impl TcasEventAction for ChannelAction {
    fn execute (&mut self, event: &TcasEvent)->Result<()> {
        self.tx.send( event.clone()).map_err( |e| op_failed!("event channel send failed: {}", e))
    }
}

/// create an unbounded event channel and the action that feeds it
pub fn event_channel ()->(ChannelAction, kanal::Receiver<TcasEvent>) {
    let (tx,rx) = kanal::unbounded();
    (ChannelAction::new(tx), rx)
}

#[derive(Default)]
pub struct EventPublisher {
    actions: Vec<Box<dyn TcasEventAction>>,
    queue: Vec<TcasEvent>,
}

impl EventPublisher {
    pub fn new ()->Self { EventPublisher::default() }

    pub fn add_action (&mut self, action: Box<dyn TcasEventAction>) {
        self.actions.push( action);
    }

    pub fn num_actions (&self)->usize { self.actions.len() }

    pub fn queue (&mut self, event: TcasEvent) {
        self.queue.push( event);
    }

    /// deliver all queued events in rank order (stable within each rank) and clear the queue. Actions that fail
    /// are dropped
    pub fn publish (&mut self) {
        if self.queue.is_empty() { return }

        self.queue.sort_by_key( |e| e.rank());
        let mut failed: Vec<usize> = Vec::new();

        for event in self.queue.drain(..) {
            for (i,action) in self.actions.iter_mut().enumerate() {
                if failed.contains( &i) { continue }
                if let Err(e) = action.execute( &event) {
                    warn!("dropping event action: {}", e);
                    failed.push( i);
                }
            }
        }

        if !failed.is_empty() {
            let mut i = 0;
            self.actions.retain( |_| { let keep = !failed.contains( &i); i += 1; keep });
        }
    }
}

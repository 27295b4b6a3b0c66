#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;

// Shared coordination logic for the dual-channel sampler.
//
// This crate stays portable across MCU firmware and host tooling by avoiding
// the Rust standard library and any executor or HAL types. The firmware and
// emulator crates supply the queues, timers, and links; everything that can
// be unit tested on a host lives here.

pub mod coordinator;
pub mod measurement;
pub mod report;
pub mod selection;
pub mod wake;

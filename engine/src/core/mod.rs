//! Core domain models for carbonated-soft-drink market measurement.
//!
//! This module defines the fundamental data structures used throughout the
//! engine, representing calendar periods, grouping dimensions, and the narrow
//! sales observations every analysis consumes.

pub mod domain;

//! Integration tests for the parameter system
//!
//! These tests verify that the parameter system behaves correctly in various scenarios.

// Tests for the Parameter struct
mod parameter_tests;

// Tests for parameter sets and pixel parameter sets
mod parameter_set_tests;

// Tests for the ParameterList registry
mod parameter_list_tests;

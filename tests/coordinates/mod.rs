//! Integration tests for pixel to sky-angle conventions

mod coordinates_tests;

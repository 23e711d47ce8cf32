//! Tests for the desktop token service

#[cfg(test)]
mod service_tests;

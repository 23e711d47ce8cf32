//! Tests for the in-memory stores

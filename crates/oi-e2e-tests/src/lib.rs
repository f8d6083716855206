//! End-to-end tests for OBD Insight. See `tests/`.

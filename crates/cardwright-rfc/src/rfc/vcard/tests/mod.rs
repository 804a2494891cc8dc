//! Document-level tests for the vCard reader, writer and validator.
//!
//! Unit tests for individual properties, scribes and parameters live next to
//! the code they cover; these exercise whole documents end to end.

mod kinds;

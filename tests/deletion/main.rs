//! Deletion E2E test suite.
//!
//! Drives the request handlers against the in-memory store and the real
//! broadcast bus, with the attachment cleanup listener running.
//!
//! Run with: cargo test --test deletion

mod test_helpers;

mod test_attachment_cleanup;
mod test_batch_delete;
mod test_launch_and_widget;
mod test_single_delete;

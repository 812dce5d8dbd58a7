//! Integration tests against a mock HTTP server and a scratch directory.

mod batch;
mod mock_server;
mod pipeline;
mod providers;

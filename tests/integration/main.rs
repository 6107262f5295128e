//! Host-side integration tests for the kettle control core.

mod mock_hw;
mod service_tests;

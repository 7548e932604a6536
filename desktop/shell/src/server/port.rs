//! Ephemeral port reservation for the Slidev child.

use crate::server::{ServerError, ServerResult};

use std::net::TcpListener;

const HOST: &str = "127.0.0.1";

pub struct PortAllocator;

impl PortAllocator {
    /// Ask the OS for a free port.
    ///
    /// The listener is released before returning, so another process may
    /// claim the port before Slidev binds it. That shows up as a normal
    /// start failure rather than a retry here.
    pub fn allocate() -> ServerResult<u16> {
        let listener = TcpListener::bind((HOST, 0)).map_err(ServerError::no_available_port)?;
        let port = listener
            .local_addr()
            .map_err(ServerError::no_available_port)?
            .port();
        Ok(port)
    }

    /// Check if a port is available for binding.
    pub fn is_available(port: u16) -> bool {
        TcpListener::bind((HOST, port)).is_ok()
    }
}

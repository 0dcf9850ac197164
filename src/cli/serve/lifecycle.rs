//! Server lifecycle management.

use crate::log;
use anyhow::{Result, anyhow};
use std::net::{IpAddr, SocketAddr};
use tiny_http::Server;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to `interface`, trying up to ten consecutive ports from `base_port`.
pub fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let Some(port) = base_port.checked_add(offset) else {
            break;
        };
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "failed to bind {} after {} attempts starting at port {}: {}",
        interface,
        MAX_PORT_RETRIES,
        base_port,
        last_error.map_or_else(|| "no port available".to_string(), |e| e.to_string())
    ))
}

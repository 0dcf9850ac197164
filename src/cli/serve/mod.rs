//! Development server: a tiny_http accept loop feeding the request core.

mod lifecycle;
mod response;

use crate::config::ServerConfig;
use crate::core::{RequestTarget, is_shutdown, register_server};
use crate::serve::{AdminApp, AdminView, Dashboard, Outcome, RequestRouter, dispatch};
use crate::{debug, log};
use anyhow::{Context, Result};
use std::io::Read;
use std::net::IpAddr;
use std::sync::Arc;
use tiny_http::{Request, Server};

/// Worker threads answering requests. Builds run on these threads, so a
/// slow build only holds up its own request.
const WORKER_THREADS: usize = 4;

/// Everything a request worker needs, shared without locks.
struct Shared {
    config: Arc<ServerConfig>,
    router: RequestRouter,
    admin: Box<dyn AdminApp>,
}

/// Bound server ready to accept requests.
pub struct BoundServer {
    server: Arc<Server>,
    shared: Arc<Shared>,
}

/// Bind the HTTP server and register it for Ctrl+C shutdown.
pub fn bind_server(interface: IpAddr, port: u16, config: Arc<ServerConfig>) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(interface, port)?;
    let server = Arc::new(server);
    register_server(Arc::clone(&server));

    let router = RequestRouter::new(config.admin_prefix(), "");
    log!("serve"; "http://{}", addr);
    log!("admin"; "http://{}{}", addr, router.url_for_view(AdminView::Edit));

    Ok(BoundServer {
        server,
        shared: Arc::new(Shared {
            config,
            router,
            admin: Box::new(Dashboard),
        }),
    })
}

impl BoundServer {
    /// Run the request loop until the server is unblocked.
    ///
    /// A panicking worker aborts the process (rayon's default for spawned
    /// jobs): a router invariant violation is never answered as a response.
    pub fn run(self) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(WORKER_THREADS)
            .thread_name(|i| format!("quire-serve-{i}"))
            .build()
            .context("failed to create request thread pool")?;

        for request in self.server.incoming_requests() {
            let shared = Arc::clone(&self.shared);
            pool.spawn(move || {
                if let Err(e) = handle_request(request, &shared) {
                    log!("serve"; "request error: {e:#}");
                }
            });
        }

        Ok(())
    }
}

fn handle_request(mut request: Request, shared: &Shared) -> Result<()> {
    if is_shutdown() {
        response::respond_unavailable(request)?;
        return Ok(());
    }

    let method = request.method().clone();
    let target = RequestTarget::from_browser(request.url());

    let status = match dispatch(&shared.router, &method, &target, &shared.config) {
        Outcome::Delegate(admin_request) => {
            let mut body = Vec::new();
            request
                .as_reader()
                .read_to_end(&mut body)
                .context("failed to read request body")?;
            let reply = shared.admin.handle(&admin_request, &body, &shared.config);
            response::send_reply(request, reply)?
        }
        outcome => {
            match &outcome {
                Outcome::Failed(e) => log!("error"; "{}: {}", target.path(), e),
                Outcome::Forbidden(e) => debug!("serve"; "rejected {}: {}", target.raw_path(), e),
                _ => {}
            }
            response::respond(request, outcome, &shared.config)?
        }
    };

    debug!("serve"; "{} {} -> {}", method, target.raw_path(), status);
    Ok(())
}

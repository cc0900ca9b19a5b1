use std::time::Duration;

use actix_web::dev::Server;
use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use awc::Client;
use log::{info, warn};

use crate::config::Config;
use crate::error::DispatchError;
use crate::pool::TargetPool;
use crate::selector::RoundRobinSelector;

/// Entry point for every inbound request: pick a target, forward to it.
#[derive(Debug)]
pub struct Dispatcher {
    selector: RoundRobinSelector,
}

impl Dispatcher {
    pub fn new(pool: TargetPool) -> Self {
        Dispatcher {
            selector: RoundRobinSelector::new(pool),
        }
    }

    /// The selector lock is released before the upstream is contacted. Failed
    /// forwards are reported to the caller, never retried on another target.
    pub async fn handle(
        &self,
        client: &Client,
        req: HttpRequest,
        payload: web::Payload,
    ) -> Result<HttpResponse, DispatchError> {
        let target = self.selector.next().map_err(|err| {
            warn!("{} for {} {}", err, req.method(), req.uri());
            err
        })?;

        info!("Forwarding request to server {:?}", target.address());

        target.forward(client, req, payload).await.map_err(|err| {
            warn!("{}", err);
            DispatchError::from(err)
        })
    }
}

pub async fn dispatch(
    req: HttpRequest,
    payload: web::Payload,
    client: web::Data<Client>,
    dispatcher: web::Data<Dispatcher>,
) -> Result<HttpResponse, DispatchError> {
    dispatcher.handle(client.get_ref(), req, payload).await
}

/// Per-worker HTTP client used for the single upstream hop.
pub fn build_client(timeout: Duration) -> Client {
    Client::builder().timeout(timeout).finish()
}

/// Bind the catch-all proxy on the configured address.
pub fn proxy(config: &Config, pool: TargetPool) -> std::io::Result<Server> {
    let dispatcher = web::Data::new(Dispatcher::new(pool));
    let timeout = config.timeout();

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(build_client(timeout)))
            .app_data(dispatcher.clone())
            .wrap(middleware::Logger::default())
            .default_service(web::to(dispatch))
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    let proxy_addr = config.load_balancer.host.as_str();
    let proxy_port = config.load_balancer.port;
    let server = server.bind((proxy_addr, proxy_port))?;
    info!("Serving requests at `{}:{}`", proxy_addr, proxy_port);

    Ok(server.run())
}

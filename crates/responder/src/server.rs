use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::result;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service;
use hyper_util::rt::TokioIo;
use tokio::net::{self, TcpStream};
use tokio::sync::broadcast;

use crate::dispatcher::Dispatcher;
use crate::errors::ServerError;
use crate::normalizer::NormalizedRequest;
use crate::types::JoinHandle;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

type HttpFuture<R, E> = dyn Future<Output = result::Result<R, E>> + Send + 'static;

/// `ResponderServer` owns the listening socket and serves each accepted
/// connection on its own task, handing every request to the shared [`Dispatcher`].
pub struct ResponderServer {
    listener: net::TcpListener,
    dispatcher: Arc<Dispatcher>,
}

// -- Constructors

impl ResponderServer {
    pub async fn bind(addr: &str, dispatcher: Arc<Dispatcher>) -> Result<Self, ServerError> {
        let listener = net::TcpListener::bind(addr)
            .await
            .map_err(|err| ServerError::BindFailed(addr.to_string(), err))?;

        Ok(Self {
            listener,
            dispatcher,
        })
    }
}

// -- Getters

impl ResponderServer {
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }
}

// -- Serving

impl ResponderServer {
    /// Accepts connections until `sig` fires (or its sender goes away).
    /// Connections already being served finish on their own tasks; a failed
    /// accept or connection is logged and never stops the server.
    pub async fn serve(self, mut sig: broadcast::Receiver<()>) -> Result<(), ServerError> {
        let local_addr = self.local_addr()?;
        chameleon_trace::info!("Chameleon responder listening on {}", local_addr);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok(connection) => {
                            let dispatcher = self.dispatcher.clone();
                            tokio::spawn(async move {
                                let client_addr = connection.1;
                                if let Err(err) = serve_connection(connection, dispatcher).await {
                                    chameleon_trace::error!(
                                        "Failed to serve http1 connection from {}: {:?}",
                                        client_addr,
                                        err,
                                    );
                                }
                            });
                        }
                        Err(err) => {
                            chameleon_trace::error!("Failed to get new client connection {:?}", err);
                            // back off when out of file descriptors
                            tokio::time::sleep(ACCEPT_BACKOFF).await;
                        }
                    }
                }

                _ = sig.recv() => {
                    chameleon_trace::info!("Stopping responder on {}", local_addr);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Runs [`ResponderServer::serve`] on a new task.
    #[must_use]
    pub fn spawn(self, sig: broadcast::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(async move { self.serve(sig).await.map_err(Into::into) })
    }
}

async fn serve_connection(
    connection: (TcpStream, SocketAddr),
    dispatcher: Arc<Dispatcher>,
) -> Result<(), ServerError> {
    let (stream, client_addr) = connection;
    chameleon_trace::debug!("Accepted connection from {}", client_addr);

    let handler = ResponderService {
        client_addr,
        dispatcher,
    };

    match http1::Builder::new()
        .title_case_headers(true)
        .serve_connection(TokioIo::new(stream), handler)
        .await
    {
        Ok(()) => {
            chameleon_trace::debug!("Finished serving connection from {}", client_addr);
            Ok(())
        }
        Err(err) => Err(ServerError::FailedStreaming(Box::new(err))),
    }
}

/// `ResponderService` collects each request body, normalizes the request and
/// renders the dispatcher's reply.
struct ResponderService {
    client_addr: SocketAddr,
    dispatcher: Arc<Dispatcher>,
}

impl service::Service<hyper::Request<Incoming>> for ResponderService {
    type Error = hyper::Error;
    type Response = hyper::Response<Full<Bytes>>;
    type Future = Pin<Box<HttpFuture<Self::Response, Self::Error>>>;

    fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
        let dispatcher = self.dispatcher.clone();
        let client_addr = self.client_addr;

        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let body = body.collect().await?.to_bytes();
            let request = NormalizedRequest::normalize(&parts, body);

            chameleon_trace::info!(
                "{} {} from {} ({} body bytes)",
                request.method,
                request.path,
                client_addr,
                request.body.len()
            );

            Ok(dispatcher.dispatch(request).into_response())
        })
    }
}

//! Route wiring: three WebSocket endpoints plus the HTTP monitoring
//! side channel, on one listening port.

use {
    crate::{control, dispatch, http, lookup, state::BrokerState},
    std::{net::SocketAddr, sync::Arc},
    warp::Filter,
};

fn with_state(
    state: Arc<BrokerState>,
) -> impl Filter<Extract = (Arc<BrokerState>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || Arc::clone(&state))
}

fn respond<F, R>(filter: F) -> impl Filter<Extract = (warp::reply::Response,), Error = warp::Rejection> + Clone
where
    F: Filter<Extract = (R,), Error = warp::Rejection> + Clone,
    R: warp::Reply,
{
    filter.map(|reply: R| reply.into_response())
}

/// Build the full set of routes over `state`. Exposed separately from
/// [`serve`] so tests can bind it to an ephemeral port.
pub fn routes(
    state: Arc<BrokerState>,
) -> impl Filter<Extract = (warp::reply::Response,), Error = warp::Rejection> + Clone {
    let announce = respond(
        warp::path!("ws" / "announce")
            .and(warp::ws())
            .and(with_state(Arc::clone(&state)))
            .map(|ws: warp::ws::Ws, state: Arc<BrokerState>| {
                ws.on_upgrade(move |socket| control::handle(socket, state))
            }),
    );

    let input = respond(
        warp::path!("ws" / "input")
            .and(warp::ws())
            .and(with_state(Arc::clone(&state)))
            .map(|ws: warp::ws::Ws, state: Arc<BrokerState>| {
                ws.on_upgrade(move |socket| dispatch::handle(socket, state))
            }),
    );

    let lookup = respond(
        warp::path!("ws" / "lookup")
            .and(warp::ws())
            .and(with_state(Arc::clone(&state)))
            .map(|ws: warp::ws::Ws, state: Arc<BrokerState>| {
                ws.on_upgrade(move |socket| lookup::handle(socket, state))
            }),
    );

    let monitoring = respond(http::routes(Arc::clone(&state)));

    announce.or(input).unify().or(lookup).unify().or(monitoring).unify()
}

/// Run the broker: bind `state.config.bind_addr`, spawn the sweeper,
/// and serve until the process is killed.
pub async fn serve(state: Arc<BrokerState>) -> anyhow::Result<()> {
    let addr: SocketAddr = state
        .config
        .bind_addr
        .parse()
        .map_err(|_| crate::error::BrokerError::InvalidBindAddress(state.config.bind_addr.clone()))?;

    tokio::spawn(crate::sweeper::run(Arc::clone(&state)));

    log::info!("agent relay listening on {addr}");
    warp::serve(routes(state)).run(addr).await;
    Ok(())
}

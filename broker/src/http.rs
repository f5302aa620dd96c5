//! Optional HTTP side channel for monitoring. Read-only, no
//! authentication, not part of the signed wire protocol.

use {crate::state::BrokerState, serde_json::json, std::sync::Arc, warp::Filter};

pub fn routes(
    state: Arc<BrokerState>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let status_state = Arc::clone(&state);
    let status = warp::path::end().and(warp::get()).map(move || {
        warp::reply::json(&json!({
            "service": "agent-relay",
            "status": "ok",
            "agents_online": status_state.registry.len(),
            "pending_requests": status_state.pending.len(),
            "oldest_pending_age_secs": status_state.pending.oldest_age().map(|d| d.as_secs()),
        }))
    });

    let agents_state = Arc::clone(&state);
    let agents = warp::path("agents").and(warp::path::end()).and(warp::get()).map(move || {
        let limit = agents_state.config.lookup_limit;
        warp::reply::json(&agents_state.registry.list_all(limit))
    });

    status.or(agents).unify()
}

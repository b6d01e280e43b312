use std::sync::Arc;

use chrono::Utc;

use crate::init::state::ServerState;

pub async fn purge_expired_signup_codes(state: Arc<ServerState>) {
    state.purge_expired_signup_codes(Utc::now()).await;
}

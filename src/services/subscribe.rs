//! Price alert subscription.

use tracing::{error, info};

use super::{Submission, SUBSCRIBE_FAILED};
use crate::backend_client::client::BackendClient;
use crate::types::backend::{StatusResponse, SubscribeRequest};
use crate::view::{input_value, View};

pub const FORM_ID: &str = "price-alert-form";

pub async fn submit_subscription(view: &dyn View, backend: &BackendClient) -> Submission {
    let Some(form) = view.element_by_id(FORM_ID) else {
        return Submission::Skipped;
    };

    let request = SubscribeRequest {
        email: input_value(view, "email").unwrap_or_default(),
        route: input_value(view, "alert-route").unwrap_or_default(),
    };

    match backend
        .post_json::<_, StatusResponse>("/api/subscribe", &request)
        .await
    {
        Ok(reply) => {
            let message = reply.message_or_default();
            view.alert(&message);
            if reply.is_success() {
                info!("[FORM] subscribed {} to {}", request.email, request.route);
            }
            view.reset_form(form);
            Submission::Alerted(message)
        }
        Err(e) => {
            error!("[FORM] subscribe failed: {}", e);
            view.alert(SUBSCRIBE_FAILED);
            Submission::Alerted(SUBSCRIBE_FAILED.into())
        }
    }
}

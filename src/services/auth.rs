//! Login and registration forms.

use tracing::{error, info, warn};

use super::{Submission, LOGIN_FAILED, REGISTER_FAILED};
use crate::backend_client::client::BackendClient;
use crate::types::backend::StatusResponse;
use crate::view::View;

pub const LOGIN_FORM: &str = "loginForm";
pub const REGISTER_FORM: &str = "registerForm";

pub async fn submit_login(view: &dyn View, backend: &BackendClient) -> Submission {
    let Some(form) = view.element_by_id(LOGIN_FORM) else {
        return Submission::Skipped;
    };
    let fields = view.form_fields(form);

    match backend.post_form::<StatusResponse>("/login", &fields).await {
        Ok(reply) if reply.is_success() => {
            info!("[FORM] login ok");
            view.navigate("/");
            Submission::Navigated("/".into())
        }
        Ok(reply) => {
            let message = reply.message_or_default();
            warn!("[FORM] login rejected: {}", message);
            view.alert(&message);
            Submission::Alerted(message)
        }
        Err(e) => {
            error!("[FORM] login failed: {}", e);
            view.alert(LOGIN_FAILED);
            Submission::Alerted(LOGIN_FAILED.into())
        }
    }
}

pub async fn submit_registration(view: &dyn View, backend: &BackendClient) -> Submission {
    let Some(form) = view.element_by_id(REGISTER_FORM) else {
        return Submission::Skipped;
    };
    let fields = view.form_fields(form);

    match backend.post_form::<StatusResponse>("/register", &fields).await {
        Ok(reply) if reply.is_success() => {
            info!("[FORM] registration ok");
            view.alert(&reply.message_or_default());
            view.navigate("/login");
            Submission::Navigated("/login".into())
        }
        Ok(reply) => {
            let message = reply.message_or_default();
            view.alert(&message);
            Submission::Alerted(message)
        }
        Err(e) => {
            error!("[FORM] registration failed: {}", e);
            view.alert(REGISTER_FAILED);
            Submission::Alerted(REGISTER_FAILED.into())
        }
    }
}

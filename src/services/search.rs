//! Flight search form.
//! The button shows a loading state while the request is out and is restored
//! whatever the outcome.

use tracing::{debug, error};

use super::{Submission, SEARCH_FAILED};
use crate::backend_client::client::BackendClient;
use crate::types::backend::FormReply;
use crate::view::{ElementId, View};

pub const SEARCH_FORM: &str = "flightSearchForm";
pub const SEARCH_BUTTON: &str = "search-btn";
pub const BUTTON_TEXT: &str = "btn-text";
pub const LOADING_CLASS: &str = "loading";
pub const LOADING_LABEL: &str = "SEARCHING...";

pub async fn submit_search(view: &dyn View, backend: &BackendClient) -> Submission {
    let Some(form) = view.element_by_id(SEARCH_FORM) else {
        return Submission::Skipped;
    };

    let action = view.attribute(form, "action").unwrap_or_else(|| "/search".into());
    let fields = view.form_fields(form);
    let busy = ButtonBusy::start(view, form);

    let outcome = match backend.submit_form(&action, &fields).await {
        Ok(FormReply::Redirected(url)) => {
            view.navigate(&url);
            Submission::Navigated(url)
        }
        Ok(FormReply::Document(html)) => {
            debug!("[FORM] search returned {} bytes of HTML", html.len());
            view.replace_document(&html);
            Submission::Replaced
        }
        Err(e) => {
            error!("[FORM] search failed: {}", e);
            view.alert(SEARCH_FAILED);
            Submission::Alerted(SEARCH_FAILED.into())
        }
    };

    busy.finish(view);
    outcome
}

struct ButtonBusy {
    button: Option<ElementId>,
    label: Option<(ElementId, String)>,
}

impl ButtonBusy {
    fn start(view: &dyn View, form: ElementId) -> Self {
        let button = view.find_in(form, SEARCH_BUTTON);
        let label = button.and_then(|b| view.find_in(b, BUTTON_TEXT)).map(|t| {
            let original = view.text(t);
            view.set_text(t, LOADING_LABEL);
            (t, original)
        });
        if let Some(b) = button {
            view.add_class(b, LOADING_CLASS);
        }
        Self { button, label }
    }

    fn finish(self, view: &dyn View) {
        if let Some(b) = self.button {
            view.remove_class(b, LOADING_CLASS);
        }
        if let Some((t, original)) = self.label {
            view.set_text(t, &original);
        }
    }
}
